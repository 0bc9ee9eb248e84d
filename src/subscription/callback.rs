// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for control subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::config::NotifyGranularity;
use crate::control::ControlIdentity;
use crate::device::DeviceId;
use crate::error::ErrorKind;
use crate::registry::{ControlChange, ControlEntry, DeviceControls};

/// Unique identifier for a subscription.
///
/// Returned by every `on_*` registration and accepted by
/// [`CallbackRegistry::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// A successful update of one device's controls.
///
/// `snapshot` is the already-swapped immutable control set; reading it never
/// blocks the scheduler.
#[derive(Debug, Clone)]
pub struct DeviceUpdate {
    /// The device.
    pub device_id: DeviceId,
    /// Controls that were added, removed or changed value.
    pub changes: Vec<ControlChange>,
    /// The control set after the update.
    pub snapshot: Arc<DeviceControls>,
}

impl DeviceUpdate {
    /// Returns the identities of the changed controls.
    pub fn changed_identities(&self) -> impl Iterator<Item = &ControlIdentity> {
        self.changes.iter().map(ControlChange::identity)
    }
}

/// A failed poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFailure {
    /// The device.
    pub device_id: DeviceId,
    /// Failure kind.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

/// Type alias for device update callbacks.
type DeviceCallback = Arc<dyn Fn(&DeviceUpdate) + Send + Sync>;

/// Type alias for single control callbacks. `None` means the control was removed.
type ControlCallback = Arc<dyn Fn(Option<&ControlEntry>) + Send + Sync>;

/// Type alias for update failure callbacks.
type FailureCallback = Arc<dyn Fn(&UpdateFailure) + Send + Sync>;

/// Type alias for unavailable callbacks.
type UnavailableCallback = Arc<dyn Fn(&DeviceId) + Send + Sync>;

/// Registry for managing control subscription callbacks.
///
/// Callbacks run synchronously on the task that produced the event, after
/// the registry snapshot was swapped. They must not block.
///
/// # Examples
///
/// ```
/// use liebherr_lib::subscription::CallbackRegistry;
///
/// let callbacks = CallbackRegistry::new();
/// let id = callbacks.on_device_changed(|update| {
///     println!("{} controls changed on {}", update.changes.len(), update.device_id);
/// });
/// assert!(callbacks.unsubscribe(id));
/// ```
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Per-device update callbacks.
    device_callbacks: RwLock<HashMap<SubscriptionId, DeviceCallback>>,
    /// Per-control callbacks with the control they watch.
    control_callbacks: RwLock<HashMap<SubscriptionId, (ControlIdentity, ControlCallback)>>,
    /// Transient failure callbacks.
    failure_callbacks: RwLock<HashMap<SubscriptionId, FailureCallback>>,
    /// Fatal unavailability callbacks.
    unavailable_callbacks: RwLock<HashMap<SubscriptionId, UnavailableCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            device_callbacks: RwLock::new(HashMap::new()),
            control_callbacks: RwLock::new(HashMap::new()),
            failure_callbacks: RwLock::new(HashMap::new()),
            unavailable_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for successful device updates.
    ///
    /// With [`NotifyGranularity::PerControl`] it fires only when at least one
    /// control changed; with [`NotifyGranularity::Device`] on every
    /// successful poll.
    pub fn on_device_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceUpdate) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.device_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for one control.
    ///
    /// The callback receives the new entry, or `None` if the control
    /// disappeared.
    pub fn on_control_changed<F>(&self, identity: ControlIdentity, callback: F) -> SubscriptionId
    where
        F: Fn(Option<&ControlEntry>) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.control_callbacks
            .write()
            .insert(id, (identity, Arc::new(callback)));
        id
    }

    /// Registers a callback for transient poll failures.
    pub fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&UpdateFailure) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.failure_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when a device stops being polled for good.
    pub fn on_unavailable<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceId) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.unavailable_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.device_callbacks.write().remove(&id).is_some()
            || self.control_callbacks.write().remove(&id).is_some()
            || self.failure_callbacks.write().remove(&id).is_some()
            || self.unavailable_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.device_callbacks.write().clear();
        self.control_callbacks.write().clear();
        self.failure_callbacks.write().clear();
        self.unavailable_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a device update.
    ///
    /// Callbacks are collected first and invoked without holding a lock, so a
    /// callback may unsubscribe itself.
    pub fn dispatch_update(&self, update: &DeviceUpdate, granularity: NotifyGranularity) {
        let broad = granularity == NotifyGranularity::Device;
        if update.changes.is_empty() && !broad {
            return;
        }

        let device_callbacks: Vec<DeviceCallback> =
            self.device_callbacks.read().values().cloned().collect();
        for callback in device_callbacks {
            callback(update);
        }

        let control_callbacks: Vec<(ControlIdentity, ControlCallback)> = self
            .control_callbacks
            .read()
            .values()
            .filter(|(identity, _)| {
                if broad {
                    identity.device_id() == &update.device_id
                } else {
                    update.changed_identities().any(|changed| changed == identity)
                }
            })
            .cloned()
            .collect();
        for (identity, callback) in control_callbacks {
            callback(update.snapshot.get(&identity));
        }
    }

    /// Dispatches a transient failure.
    pub fn dispatch_failure(&self, failure: &UpdateFailure) {
        let callbacks: Vec<FailureCallback> =
            self.failure_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(failure);
        }
    }

    /// Dispatches a fatal unavailability.
    pub fn dispatch_unavailable(&self, device_id: &DeviceId) {
        let callbacks: Vec<UnavailableCallback> =
            self.unavailable_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(device_id);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.device_callbacks.read().len()
            + self.control_callbacks.read().len()
            + self.failure_callbacks.read().len()
            + self.unavailable_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    use crate::control::{Control, ControlType, ControlValue};
    use crate::registry::ControlRegistry;

    fn device() -> DeviceId {
        DeviceId::new("942007")
    }

    fn toggle(name: &str, on: bool) -> Control {
        Control::new(ControlType::Toggle, name, ControlValue::Toggle(on))
    }

    fn update(registry: &ControlRegistry, controls: Vec<Control>) -> DeviceUpdate {
        let changes = registry.replace(&device(), controls);
        DeviceUpdate {
            device_id: device(),
            changes,
            snapshot: registry.snapshot(&device()).unwrap(),
        }
    }

    fn counter() -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        let counter = Arc::new(AtomicU32::new(0));
        (counter.clone(), counter)
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(42).to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let callbacks = CallbackRegistry::new();
        assert!(callbacks.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let callbacks = CallbackRegistry::new();
        let a = callbacks.on_unavailable(|_| {});
        let b = callbacks.on_unavailable(|_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn per_control_only_fires_for_changed_controls() {
        let registry = ControlRegistry::new();
        let callbacks = CallbackRegistry::new();
        update(&registry, vec![toggle("nightmode", false), toggle("partymode", false)]);

        let (night_hits, night) = counter();
        let (party_hits, party) = counter();
        callbacks.on_control_changed(toggle("nightmode", false).identity(&device()), move |entry| {
            assert_eq!(entry.unwrap().control().value(), &ControlValue::Toggle(true));
            night.fetch_add(1, Ordering::SeqCst);
        });
        callbacks.on_control_changed(toggle("partymode", false).identity(&device()), move |_| {
            party.fetch_add(1, Ordering::SeqCst);
        });

        let u = update(&registry, vec![toggle("nightmode", true), toggle("partymode", false)]);
        callbacks.dispatch_update(&u, NotifyGranularity::PerControl);

        assert_eq!(night_hits.load(Ordering::SeqCst), 1);
        assert_eq!(party_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn per_control_is_silent_without_changes() {
        let registry = ControlRegistry::new();
        let callbacks = CallbackRegistry::new();
        update(&registry, vec![toggle("nightmode", false)]);

        let (hits, c) = counter();
        callbacks.on_device_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let u = update(&registry, vec![toggle("nightmode", false)]);
        assert!(u.changes.is_empty());
        callbacks.dispatch_update(&u, NotifyGranularity::PerControl);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn device_granularity_fires_every_poll() {
        let registry = ControlRegistry::new();
        let callbacks = CallbackRegistry::new();
        update(&registry, vec![toggle("nightmode", false), toggle("partymode", false)]);

        let (device_hits, d) = counter();
        let (control_hits, c) = counter();
        callbacks.on_device_changed(move |_| {
            d.fetch_add(1, Ordering::SeqCst);
        });
        callbacks.on_control_changed(toggle("partymode", false).identity(&device()), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let u = update(&registry, vec![toggle("nightmode", false), toggle("partymode", false)]);
        callbacks.dispatch_update(&u, NotifyGranularity::Device);

        assert_eq!(device_hits.load(Ordering::SeqCst), 1);
        assert_eq!(control_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn device_granularity_ignores_other_devices() {
        let registry = ControlRegistry::new();
        let callbacks = CallbackRegistry::new();

        let (hits, c) = counter();
        let elsewhere = toggle("nightmode", false).identity(&DeviceId::new("other"));
        callbacks.on_control_changed(elsewhere, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let u = update(&registry, vec![toggle("nightmode", false)]);
        callbacks.dispatch_update(&u, NotifyGranularity::Device);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removed_control_receives_none() {
        let registry = ControlRegistry::new();
        let callbacks = CallbackRegistry::new();
        update(&registry, vec![toggle("nightmode", false)]);

        let (hits, c) = counter();
        callbacks.on_control_changed(toggle("nightmode", false).identity(&device()), move |entry| {
            assert!(entry.is_none());
            c.fetch_add(1, Ordering::SeqCst);
        });

        let u = update(&registry, vec![]);
        callbacks.dispatch_update(&u, NotifyGranularity::PerControl);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let callbacks = CallbackRegistry::new();
        let (hits, c) = counter();
        let id = callbacks.on_update_failed(move |failure| {
            assert_eq!(failure.kind, ErrorKind::RateLimit);
            c.fetch_add(1, Ordering::SeqCst);
        });

        let failure = UpdateFailure {
            device_id: device(),
            kind: ErrorKind::RateLimit,
            message: "API rate limit exceeded".to_string(),
        };
        callbacks.dispatch_failure(&failure);
        assert!(callbacks.unsubscribe(id));
        assert!(!callbacks.unsubscribe(id));
        callbacks.dispatch_failure(&failure);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unavailable_dispatch() {
        let callbacks = CallbackRegistry::new();
        let (hits, c) = counter();
        callbacks.on_unavailable(move |id| {
            assert_eq!(id.as_str(), "942007");
            c.fetch_add(1, Ordering::SeqCst);
        });
        callbacks.dispatch_unavailable(&device());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let callbacks = CallbackRegistry::new();
        callbacks.on_device_changed(|_| {});
        callbacks.on_update_failed(|_| {});
        assert_eq!(callbacks.callback_count(), 2);
        callbacks.clear();
        assert!(callbacks.is_empty());
    }
}
