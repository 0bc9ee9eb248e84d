// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observer fan-out shared by schedulers and the command pipeline.

use std::sync::Arc;

use crate::config::NotifyGranularity;
use crate::control::{ControlIdentity, ControlValue};
use crate::device::DeviceId;
use crate::error::Error;
use crate::event::{ApplianceEvent, EventBus};
use crate::registry::{ControlChange, DeviceControls};

use super::{CallbackRegistry, DeviceUpdate, UpdateFailure};

/// Delivers every outcome to both the callback registry and the event bus.
#[derive(Debug, Clone)]
pub struct Notifier {
    callbacks: Arc<CallbackRegistry>,
    events: EventBus,
    granularity: NotifyGranularity,
}

impl Notifier {
    /// Creates a notifier.
    #[must_use]
    pub fn new(callbacks: Arc<CallbackRegistry>, events: EventBus, granularity: NotifyGranularity) -> Self {
        Self {
            callbacks,
            events,
            granularity,
        }
    }

    /// Returns the callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    /// Returns the event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the notification granularity.
    #[must_use]
    pub fn granularity(&self) -> NotifyGranularity {
        self.granularity
    }

    /// Notifies a successful replace of a device's controls.
    pub fn controls_replaced(
        &self,
        device_id: &DeviceId,
        changes: Vec<ControlChange>,
        snapshot: Arc<DeviceControls>,
    ) {
        tracing::debug!(device_id = %device_id, changed = changes.len(), "Controls updated");

        if !changes.is_empty() || self.granularity == NotifyGranularity::Device {
            self.events
                .publish(ApplianceEvent::controls_changed(device_id.clone(), changes.clone()));
        }

        let update = DeviceUpdate {
            device_id: device_id.clone(),
            changes,
            snapshot,
        };
        self.callbacks.dispatch_update(&update, self.granularity);
    }

    /// Notifies an optimistic patch after an accepted command.
    pub fn command_applied(
        &self,
        identity: &ControlIdentity,
        value: ControlValue,
        changed: bool,
        snapshot: Arc<DeviceControls>,
    ) {
        self.events
            .publish(ApplianceEvent::command_applied(identity.clone(), value));

        let changes = if changed {
            vec![ControlChange::Updated(identity.clone())]
        } else {
            Vec::new()
        };
        let update = DeviceUpdate {
            device_id: identity.device_id().clone(),
            changes,
            snapshot,
        };
        self.callbacks
            .dispatch_update(&update, NotifyGranularity::PerControl);
    }

    /// Notifies a transient poll failure.
    pub fn update_failed(&self, device_id: &DeviceId, error: &Error) {
        let failure = UpdateFailure {
            device_id: device_id.clone(),
            kind: error.kind(),
            message: error.to_string(),
        };
        self.events.publish(ApplianceEvent::update_failed(
            failure.device_id.clone(),
            failure.kind,
            failure.message.clone(),
        ));
        self.callbacks.dispatch_failure(&failure);
    }

    /// Notifies that a device will no longer be polled.
    pub fn unavailable(&self, device_id: &DeviceId) {
        self.events
            .publish(ApplianceEvent::unavailable(device_id.clone()));
        self.callbacks.dispatch_unavailable(device_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::control::{Control, ControlType};
    use crate::error::ApiError;
    use crate::registry::ControlRegistry;

    fn notifier(granularity: NotifyGranularity) -> Notifier {
        Notifier::new(Arc::new(CallbackRegistry::new()), EventBus::new(), granularity)
    }

    #[test]
    fn unchanged_poll_publishes_nothing_per_control() {
        let notifier = notifier(NotifyGranularity::PerControl);
        let mut rx = notifier.events().subscribe();
        let registry = ControlRegistry::new();
        let device = DeviceId::new("1");
        registry.replace(&device, vec![]);

        notifier.controls_replaced(&device, vec![], registry.snapshot(&device).unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unchanged_poll_publishes_in_device_mode() {
        let notifier = notifier(NotifyGranularity::Device);
        let mut rx = notifier.events().subscribe();
        let registry = ControlRegistry::new();
        let device = DeviceId::new("1");
        registry.replace(&device, vec![]);

        notifier.controls_replaced(&device, vec![], registry.snapshot(&device).unwrap());
        assert!(matches!(
            rx.try_recv().unwrap(),
            ApplianceEvent::ControlsChanged { changes, .. } if changes.is_empty()
        ));
    }

    #[test]
    fn failure_reaches_callbacks_and_bus() {
        let notifier = notifier(NotifyGranularity::PerControl);
        let mut rx = notifier.events().subscribe();
        let hits = Arc::new(AtomicU32::new(0));
        let h = hits.clone();
        notifier.callbacks().on_update_failed(move |failure| {
            assert_eq!(failure.kind, crate::error::ErrorKind::RateLimit);
            h.fetch_add(1, Ordering::SeqCst);
        });

        notifier.update_failed(&DeviceId::new("1"), &Error::from(ApiError::RateLimited));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(rx.try_recv().unwrap().is_availability());
    }

    #[test]
    fn command_applied_fires_control_callback() {
        let notifier = notifier(NotifyGranularity::PerControl);
        let registry = ControlRegistry::new();
        let device = DeviceId::new("1");
        let night = Control::new(ControlType::Toggle, "nightmode", ControlValue::Toggle(false));
        let id = night.identity(&device);
        registry.replace(&device, vec![night]);
        registry.apply_optimistic(&id, ControlValue::Toggle(true)).unwrap();

        let hits = Arc::new(AtomicU32::new(0));
        let h = hits.clone();
        notifier.callbacks().on_control_changed(id.clone(), move |entry| {
            assert!(entry.unwrap().is_pending());
            h.fetch_add(1, Ordering::SeqCst);
        });

        notifier.command_applied(
            &id,
            ControlValue::Toggle(true),
            true,
            registry.snapshot(&device).unwrap(),
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
