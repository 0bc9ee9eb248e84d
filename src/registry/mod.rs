// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory control registry.
//!
//! The registry holds, per device, an immutable [`DeviceControls`] snapshot
//! behind an `Arc`. Updates build a new snapshot and swap the pointer under
//! a short write lock, so a reader never observes a half-replaced control
//! set.
//!
//! # Examples
//!
//! ```
//! use liebherr_lib::{Control, ControlType, ControlValue, DeviceId};
//! use liebherr_lib::registry::ControlRegistry;
//!
//! let registry = ControlRegistry::new();
//! let device = DeviceId::new("942007");
//! let night = Control::new(ControlType::Toggle, "nightmode", ControlValue::Toggle(false));
//!
//! let changes = registry.replace(&device, vec![night.clone()]);
//! assert_eq!(changes.len(), 1);
//!
//! // Same list again: nothing changed
//! assert!(registry.replace(&device, vec![night.clone()]).is_empty());
//!
//! let id = night.identity(&device);
//! assert_eq!(registry.get(&id), Some(night));
//! ```

mod change;
mod snapshot;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

pub use change::ControlChange;
pub use snapshot::{ControlEntry, DeviceControls};

use crate::control::{Control, ControlIdentity, ControlValue};
use crate::device::DeviceId;
use crate::error::{Error, Result};

/// Per-device control snapshots with atomic swap semantics.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    devices: RwLock<HashMap<DeviceId, Arc<DeviceControls>>>,
}

impl ControlRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole control set of a device.
    ///
    /// Returns one [`ControlChange`] per identity that was added, removed or
    /// whose value differs from the previous snapshot. Pending optimistic
    /// patches are discarded: the polled value always wins.
    ///
    /// Duplicate identities in `controls` keep the last occurrence.
    pub fn replace(&self, device_id: &DeviceId, controls: Vec<Control>) -> Vec<ControlChange> {
        let mut entries = BTreeMap::new();
        for control in controls {
            let identity = control.identity(device_id);
            if entries
                .insert(identity.clone(), ControlEntry::confirmed(control))
                .is_some()
            {
                tracing::warn!(device_id = %device_id, control = %identity, "Duplicate control identity, keeping last");
            }
        }

        let next = Arc::new(DeviceControls::new(device_id.clone(), entries, Utc::now()));
        let previous = self
            .devices
            .write()
            .insert(device_id.clone(), Arc::clone(&next));

        let changes = diff(previous.as_deref(), &next);
        tracing::trace!(device_id = %device_id, controls = next.len(), changed = changes.len(), "Replaced controls");
        changes
    }

    /// Overwrites the value of one control ahead of poll confirmation.
    ///
    /// The entry is marked pending until the next [`replace`](Self::replace)
    /// for that device. Returns `true` if the value differs from the one it
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] or [`Error::ControlNotFound`] if the
    /// identity is not in the current snapshot.
    pub fn apply_optimistic(&self, identity: &ControlIdentity, value: ControlValue) -> Result<bool> {
        let mut devices = self.devices.write();
        let current = devices
            .get(identity.device_id())
            .ok_or_else(|| Error::DeviceNotFound(identity.device_id().clone()))?;

        let mut next = DeviceControls::clone(current);
        let entry = next
            .entries_mut()
            .get_mut(identity)
            .ok_or_else(|| Error::ControlNotFound(identity.clone()))?;

        let changed = entry.control().value() != &value;
        let mut control = entry.control().clone();
        control.set_value(value);
        *entry = ControlEntry::patched(control);

        devices.insert(identity.device_id().clone(), Arc::new(next));
        Ok(changed)
    }

    /// Returns the current control for an identity.
    #[must_use]
    pub fn get(&self, identity: &ControlIdentity) -> Option<Control> {
        self.entry(identity).map(|entry| entry.control().clone())
    }

    /// Returns the current entry (control and pending flag) for an identity.
    #[must_use]
    pub fn entry(&self, identity: &ControlIdentity) -> Option<ControlEntry> {
        self.snapshot(identity.device_id())
            .and_then(|snapshot| snapshot.get(identity).cloned())
    }

    /// Returns the current snapshot of a device.
    #[must_use]
    pub fn snapshot(&self, device_id: &DeviceId) -> Option<Arc<DeviceControls>> {
        self.devices.read().get(device_id).cloned()
    }

    /// Returns the ids of all devices with a snapshot.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().keys().cloned().collect()
    }

    /// Returns the number of devices with a snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if no device has been fetched yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

fn diff(previous: Option<&DeviceControls>, next: &DeviceControls) -> Vec<ControlChange> {
    let Some(previous) = previous else {
        return next
            .entries()
            .keys()
            .cloned()
            .map(ControlChange::Added)
            .collect();
    };

    let mut changes: Vec<ControlChange> = next
        .entries()
        .iter()
        .filter_map(|(id, entry)| match previous.get(id) {
            None => Some(ControlChange::Added(id.clone())),
            Some(old) if old.control().value() != entry.control().value() => {
                Some(ControlChange::Updated(id.clone()))
            }
            Some(_) => None,
        })
        .collect();

    changes.extend(
        previous
            .entries()
            .keys()
            .filter(|id| next.get(id).is_none())
            .cloned()
            .map(ControlChange::Removed),
    );

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlBounds, ControlType};
    use crate::types::DoorPosition;

    fn device() -> DeviceId {
        DeviceId::new("942007")
    }

    fn temperature(current: i32, target: i32) -> Control {
        Control::new(
            ControlType::Temperature,
            "fridge",
            ControlValue::Temperature {
                current: Some(current),
                target: Some(target),
            },
        )
    }

    fn toggle(name: &str, on: bool) -> Control {
        Control::new(ControlType::Toggle, name, ControlValue::Toggle(on))
    }

    #[test]
    fn replace_then_get_returns_every_control() {
        let registry = ControlRegistry::new();
        let controls = vec![temperature(5, 4), toggle("nightmode", true), toggle("partymode", false)];

        let changes = registry.replace(&device(), controls.clone());
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(ControlChange::is_added));

        for control in controls {
            assert_eq!(registry.get(&control.identity(&device())), Some(control));
        }
    }

    #[test]
    fn absent_identities_are_removed() {
        let registry = ControlRegistry::new();
        let party = toggle("partymode", false);
        registry.replace(&device(), vec![temperature(5, 4), party.clone()]);

        let changes = registry.replace(&device(), vec![temperature(5, 4)]);
        assert_eq!(changes, vec![ControlChange::Removed(party.identity(&device()))]);
        assert_eq!(registry.get(&party.identity(&device())), None);
    }

    #[test]
    fn replace_is_idempotent() {
        let registry = ControlRegistry::new();
        let controls = vec![temperature(5, 4), toggle("nightmode", true)];
        registry.replace(&device(), controls.clone());
        assert!(registry.replace(&device(), controls).is_empty());
    }

    #[test]
    fn value_change_is_detected() {
        let registry = ControlRegistry::new();
        registry.replace(&device(), vec![temperature(5, 4)]);

        let changes = registry.replace(&device(), vec![temperature(6, 4)]);
        assert_eq!(
            changes,
            vec![ControlChange::Updated(temperature(6, 4).identity(&device()))]
        );
    }

    #[test]
    fn bounds_change_is_not_a_value_change() {
        let registry = ControlRegistry::new();
        registry.replace(&device(), vec![temperature(5, 4)]);

        let widened = temperature(5, 4).with_bounds(ControlBounds {
            min: Some(1),
            max: Some(9),
            ..ControlBounds::default()
        });
        assert!(registry.replace(&device(), vec![widened.clone()]).is_empty());
        assert_eq!(registry.get(&widened.identity(&device())).unwrap().bounds().max, Some(9));
    }

    #[test]
    fn unknown_types_are_stored() {
        let registry = ControlRegistry::new();
        let filter = Control::new(
            ControlType::Other("WaterFilterControl".to_string()),
            "waterfilter",
            ControlValue::Raw(serde_json::json!({"value": 80})),
        );
        registry.replace(&device(), vec![filter.clone()]);
        assert_eq!(registry.get(&filter.identity(&device())), Some(filter));
    }

    #[test]
    fn duplicates_keep_last() {
        let registry = ControlRegistry::new();
        registry.replace(&device(), vec![toggle("nightmode", false), toggle("nightmode", true)]);
        let snapshot = registry.snapshot(&device()).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            registry.get(&toggle("nightmode", true).identity(&device())).unwrap().value(),
            &ControlValue::Toggle(true)
        );
    }

    #[test]
    fn devices_are_independent() {
        let registry = ControlRegistry::new();
        let other = DeviceId::new("other");
        registry.replace(&device(), vec![toggle("nightmode", true)]);
        registry.replace(&other, vec![]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.snapshot(&device()).unwrap().len(), 1);
        assert!(registry.snapshot(&other).unwrap().is_empty());
    }

    #[test]
    fn optimistic_patch_is_pending_until_next_replace() {
        let registry = ControlRegistry::new();
        let night = toggle("nightmode", false);
        let id = night.identity(&device());
        registry.replace(&device(), vec![night]);

        assert!(registry.apply_optimistic(&id, ControlValue::Toggle(true)).unwrap());
        let entry = registry.entry(&id).unwrap();
        assert!(entry.is_pending());
        assert_eq!(entry.control().value(), &ControlValue::Toggle(true));

        // Poll confirms: no change, pending cleared
        let changes = registry.replace(&device(), vec![toggle("nightmode", true)]);
        assert!(changes.is_empty());
        assert!(!registry.entry(&id).unwrap().is_pending());
    }

    #[test]
    fn poll_overrides_optimistic_patch() {
        let registry = ControlRegistry::new();
        let night = toggle("nightmode", false);
        let id = night.identity(&device());
        registry.replace(&device(), vec![night.clone()]);
        registry.apply_optimistic(&id, ControlValue::Toggle(true)).unwrap();

        let changes = registry.replace(&device(), vec![night]);
        assert_eq!(changes, vec![ControlChange::Updated(id.clone())]);
        assert_eq!(registry.get(&id).unwrap().value(), &ControlValue::Toggle(false));
    }

    #[test]
    fn optimistic_patch_keeps_other_fields() {
        let registry = ControlRegistry::new();
        let door = Control::new(
            ControlType::AutoDoor,
            "autodoor",
            ControlValue::Door(DoorPosition::Closed),
        )
        .with_zone(1, None);
        let id = door.identity(&device());
        registry.replace(&device(), vec![door]);
        let fetched_at = registry.snapshot(&device()).unwrap().fetched_at();

        registry
            .apply_optimistic(&id, ControlValue::Door(DoorPosition::Moving))
            .unwrap();
        let patched = registry.get(&id).unwrap();
        assert_eq!(patched.zone_id(), 1);
        assert_eq!(patched.value(), &ControlValue::Door(DoorPosition::Moving));
        assert_eq!(registry.snapshot(&device()).unwrap().fetched_at(), fetched_at);
    }

    #[test]
    fn optimistic_patch_on_missing_control_fails() {
        let registry = ControlRegistry::new();
        let id = toggle("nightmode", true).identity(&device());
        assert!(matches!(
            registry.apply_optimistic(&id, ControlValue::Toggle(true)),
            Err(Error::DeviceNotFound(_))
        ));

        registry.replace(&device(), vec![]);
        assert!(matches!(
            registry.apply_optimistic(&id, ControlValue::Toggle(true)),
            Err(Error::ControlNotFound(_))
        ));
    }

    #[test]
    fn held_snapshot_is_not_mutated() {
        let registry = ControlRegistry::new();
        let night = toggle("nightmode", false);
        let id = night.identity(&device());
        registry.replace(&device(), vec![night]);

        let held = registry.snapshot(&device()).unwrap();
        registry.replace(&device(), vec![toggle("nightmode", true)]);

        assert_eq!(
            held.get(&id).unwrap().control().value(),
            &ControlValue::Toggle(false)
        );
    }
}
