// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance event types.

use crate::control::{ControlIdentity, ControlValue};
use crate::device::DeviceId;
use crate::error::ErrorKind;
use crate::registry::ControlChange;

/// Events emitted by the polling core.
///
/// Every event carries the id of the device it concerns.
///
/// # Examples
///
/// ```
/// use liebherr_lib::DeviceId;
/// use liebherr_lib::event::ApplianceEvent;
///
/// let event = ApplianceEvent::unavailable(DeviceId::new("942007"));
/// assert!(event.is_availability());
/// assert_eq!(event.device_id().as_str(), "942007");
/// ```
#[derive(Debug, Clone)]
pub enum ApplianceEvent {
    /// A poll or an optimistic patch changed at least one control.
    ControlsChanged {
        /// The device.
        device_id: DeviceId,
        /// What changed.
        changes: Vec<ControlChange>,
    },

    /// A command was accepted and applied optimistically.
    CommandApplied {
        /// The written control.
        identity: ControlIdentity,
        /// The value now shown, pending confirmation.
        value: ControlValue,
    },

    /// A poll failed; last-known values are kept but stale.
    UpdateFailed {
        /// The device.
        device_id: DeviceId,
        /// Failure kind.
        kind: ErrorKind,
        /// Error message.
        message: String,
    },

    /// Polling stopped for good (credential rejected).
    Unavailable {
        /// The device.
        device_id: DeviceId,
    },
}

impl ApplianceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::ControlsChanged { device_id, .. }
            | Self::UpdateFailed { device_id, .. }
            | Self::Unavailable { device_id } => device_id,
            Self::CommandApplied { identity, .. } => identity.device_id(),
        }
    }

    /// Returns `true` for failure and unavailability events.
    #[must_use]
    pub fn is_availability(&self) -> bool {
        matches!(self, Self::UpdateFailed { .. } | Self::Unavailable { .. })
    }

    /// Creates a controls changed event.
    #[must_use]
    pub fn controls_changed(device_id: DeviceId, changes: Vec<ControlChange>) -> Self {
        Self::ControlsChanged { device_id, changes }
    }

    /// Creates a command applied event.
    #[must_use]
    pub fn command_applied(identity: ControlIdentity, value: ControlValue) -> Self {
        Self::CommandApplied { identity, value }
    }

    /// Creates an update failed event.
    #[must_use]
    pub fn update_failed(device_id: DeviceId, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::UpdateFailed {
            device_id,
            kind,
            message: message.into(),
        }
    }

    /// Creates an unavailable event.
    #[must_use]
    pub fn unavailable(device_id: DeviceId) -> Self {
        Self::Unavailable { device_id }
    }
}
