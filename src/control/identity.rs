// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable control identity.

use std::fmt;

use super::ControlType;
use crate::device::DeviceId;

/// Identity of a control: (device, control type, zone, name).
///
/// Unique within a registry snapshot and stable across polls. Used as the
/// diff key, the door side-table key and the source of external ids.
///
/// # Examples
///
/// ```
/// use liebherr_lib::{ControlIdentity, ControlType, DeviceId};
///
/// let id = ControlIdentity::new(DeviceId::new("942007"), ControlType::Toggle, 1, "supercool");
/// assert_eq!(id.unique_id(), "liebherr_942007_supercool_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlIdentity {
    device_id: DeviceId,
    control_type: ControlType,
    zone_id: u32,
    name: String,
}

impl ControlIdentity {
    /// Creates a control identity.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        control_type: ControlType,
        zone_id: u32,
        name: impl Into<String>,
    ) -> Self {
        Self {
            device_id,
            control_type,
            zone_id,
            name: name.into(),
        }
    }

    /// Returns the owning device.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the control family.
    #[must_use]
    pub fn control_type(&self) -> &ControlType {
        &self.control_type
    }

    /// Returns the zone identifier (0 = whole device).
    #[must_use]
    pub fn zone_id(&self) -> u32 {
        self.zone_id
    }

    /// Returns the control name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the externally visible identifier.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("liebherr_{}_{}_{}", self.device_id, self.name, self.zone_id)
    }
}

impl fmt::Display for ControlIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.device_id,
            self.control_type.as_api_str(),
            self.zone_id,
            self.name
        )
    }
}
