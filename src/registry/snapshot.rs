// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable per-device control snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::control::{Control, ControlIdentity, ControlType};
use crate::device::DeviceId;

/// A control plus its confirmation status.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlEntry {
    control: Control,
    pending: bool,
}

impl ControlEntry {
    pub(crate) fn confirmed(control: Control) -> Self {
        Self {
            control,
            pending: false,
        }
    }

    pub(crate) fn patched(control: Control) -> Self {
        Self {
            control,
            pending: true,
        }
    }

    /// Returns the control.
    #[must_use]
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Returns `true` while an optimistic patch awaits poll confirmation.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// All controls of one device as of one fetch.
///
/// Snapshots are never mutated once published; the registry swaps in a new
/// one instead. Readers holding an `Arc<DeviceControls>` always see a
/// complete control set.
#[derive(Debug, Clone)]
pub struct DeviceControls {
    device_id: DeviceId,
    entries: BTreeMap<ControlIdentity, ControlEntry>,
    fetched_at: DateTime<Utc>,
}

impl DeviceControls {
    pub(crate) fn new(
        device_id: DeviceId,
        entries: BTreeMap<ControlIdentity, ControlEntry>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            device_id,
            entries,
            fetched_at,
        }
    }

    /// Returns the device these controls belong to.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns when the controls were last fetched successfully.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Looks up one entry.
    #[must_use]
    pub fn get(&self, identity: &ControlIdentity) -> Option<&ControlEntry> {
        self.entries.get(identity)
    }

    /// Iterates entries in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&ControlIdentity, &ControlEntry)> {
        self.entries.iter()
    }

    /// Iterates controls in identity order.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.entries.values().map(ControlEntry::control)
    }

    /// Iterates the entries of one control family.
    pub fn of_type<'a>(
        &'a self,
        control_type: &'a ControlType,
    ) -> impl Iterator<Item = (&'a ControlIdentity, &'a ControlEntry)> + 'a {
        self.entries
            .iter()
            .filter(move |(id, _)| id.control_type() == control_type)
    }

    /// Returns the number of controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the device reported no controls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &BTreeMap<ControlIdentity, ControlEntry> {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut BTreeMap<ControlIdentity, ControlEntry> {
        &mut self.entries
    }
}
