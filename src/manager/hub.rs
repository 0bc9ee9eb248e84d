// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account-level orchestration of schedulers, registry and commands.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::command::{CommandOutcome, CommandPipeline, ControlCommand};
use crate::config::{PollStrategy, Settings};
use crate::control::{Control, ControlIdentity};
use crate::device::{Device, DeviceId};
use crate::entity::{EntityDescriptor, ZoneNames, describe};
use crate::error::{Error, Result};
use crate::event::{ApplianceEvent, EventBus};
use crate::protocol::ApplianceApi;
use crate::registry::{ControlEntry, ControlRegistry, DeviceControls};
use crate::resolver::{BrightnessScale, DoorState, DoorTracker};
use crate::scheduler::{
    MIN_POLL_INTERVAL, PollScheduler, SchedulerState, TickOutcome, compute_interval,
    per_device_interval,
};
use crate::subscription::{CallbackRegistry, Notifier};

/// Owns everything needed to keep one account's appliances in sync.
///
/// Created with [`setup`](Self::setup), which performs the first refresh of
/// every appliance. Background polling starts with [`start`](Self::start)
/// and ends with [`stop`](Self::stop).
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use liebherr_lib::command::ControlCommand;
/// use liebherr_lib::config::Settings;
/// use liebherr_lib::manager::ApplianceHub;
/// use liebherr_lib::protocol::HttpClient;
///
/// # async fn example() -> liebherr_lib::Result<()> {
/// let api = Arc::new(HttpClient::new("my-api-key")?);
/// let hub = ApplianceHub::setup(api, Settings::default()).await?;
/// hub.start();
///
/// for entity in hub.entities() {
///     println!("{} ({})", entity.name, entity.kind);
/// }
///
/// if let Some(entity) = hub.entities().into_iter().find(|e| e.unique_id.ends_with("fridge_0")) {
///     hub.submit_and_refresh(&entity.identity, ControlCommand::SetTemperature(4)).await?;
/// }
///
/// hub.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct ApplianceHub<A> {
    settings: Settings,
    devices: Vec<Device>,
    registry: Arc<ControlRegistry>,
    doors: Arc<DoorTracker>,
    notifier: Notifier,
    pipeline: CommandPipeline<A>,
    schedulers: Vec<Arc<PollScheduler<A>>>,
    zone_names: ZoneNames,
    cancel: Mutex<CancellationToken>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<A: ApplianceApi> ApplianceHub<A> {
    /// Lists the account's appliances and performs their first refresh.
    ///
    /// Appliances are refreshed one after another; the first failure aborts
    /// setup. After a successful setup the poll interval is derived from the
    /// appliance count: per-device schedulers use [`per_device_interval`],
    /// a sequential scheduler spaces its rounds with [`compute_interval`].
    ///
    /// # Errors
    ///
    /// - [`Error::Value`] if the settings are out of range
    /// - an error of kind `Auth` if the API key is rejected
    /// - any listing or first-refresh failure
    pub async fn setup(api: Arc<A>, settings: Settings) -> Result<Self> {
        settings.validate()?;

        let devices = api.list_appliances().await.inspect_err(|e| {
            if e.is_auth() {
                tracing::error!("Invalid API key, need to reauth");
            } else {
                tracing::error!(error = %e, "Error on setup");
            }
        })?;
        tracing::debug!(count = devices.len(), "Appliances listed");

        let registry = Arc::new(ControlRegistry::new());
        let doors = Arc::new(DoorTracker::new());
        let notifier = Notifier::new(
            Arc::new(CallbackRegistry::new()),
            EventBus::new(),
            settings.notify,
        );

        let base = settings.poll_interval();
        let ids: Vec<DeviceId> = devices.iter().map(|d| d.id().clone()).collect();
        let schedulers: Vec<Arc<PollScheduler<A>>> = match settings.poll_strategy {
            PollStrategy::PerDevice => ids
                .iter()
                .map(|id| {
                    Arc::new(PollScheduler::new(
                        vec![id.clone()],
                        api.clone(),
                        registry.clone(),
                        doors.clone(),
                        notifier.clone(),
                        base,
                    ))
                })
                .collect(),
            PollStrategy::Sequential if ids.is_empty() => Vec::new(),
            PollStrategy::Sequential => vec![Arc::new(
                PollScheduler::new(
                    ids.clone(),
                    api.clone(),
                    registry.clone(),
                    doors.clone(),
                    notifier.clone(),
                    base,
                )
                .with_inter_device_delay(base),
            )],
        };

        let pipeline = CommandPipeline::new(api, registry.clone(), doors.clone(), notifier.clone())
            .with_devices(&devices);

        let hub = Self {
            settings,
            devices,
            registry,
            doors,
            notifier,
            pipeline,
            schedulers,
            zone_names: ZoneNames::default(),
            cancel: Mutex::new(CancellationToken::new()),
            tasks: Mutex::new(Vec::new()),
        };

        for id in &ids {
            hub.refresh(id).await.inspect_err(|e| {
                if e.is_auth() {
                    tracing::error!(device_id = %id, "Invalid API key, need to reauth");
                } else {
                    tracing::error!(device_id = %id, error = %e, "First refresh failed");
                }
            })?;
        }

        let interval = match hub.settings.poll_strategy {
            PollStrategy::PerDevice => per_device_interval(base, MIN_POLL_INTERVAL, ids.len()),
            PollStrategy::Sequential => compute_interval(base, MIN_POLL_INTERVAL, ids.len()),
        };
        for scheduler in &hub.schedulers {
            scheduler.set_interval(interval);
        }
        tracing::debug!(
            devices = ids.len(),
            interval_secs = interval.as_secs(),
            "Setup complete"
        );

        Ok(hub)
    }

    /// Replaces the zone name table used by [`entities`](Self::entities).
    #[must_use]
    pub fn with_zone_names(mut self, zone_names: ZoneNames) -> Self {
        self.zone_names = zone_names;
        self
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Spawns the background polling tasks.
    ///
    /// Schedulers are started [`MIN_POLL_INTERVAL`] apart so their fetches
    /// never land together. Does nothing if they are already running. Must
    /// be called within a Tokio runtime.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }

        let cancel = self.cancel.lock().clone();
        let mut offset = Duration::ZERO;
        for scheduler in &self.schedulers {
            let scheduler = scheduler.clone();
            let token = cancel.child_token();
            let delay = offset;
            tasks.push(tokio::spawn(async move {
                if !delay.is_zero() {
                    tokio::select! {
                        () = token.cancelled() => return,
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                scheduler.run(token).await;
            }));
            offset += MIN_POLL_INTERVAL;
        }
        tracing::debug!(tasks = tasks.len(), "Polling started");
    }

    /// Stops background polling and waits for the tasks to finish.
    ///
    /// Pending waits are cancelled at once; fetches already in flight
    /// complete and commit. Polling can be started again afterwards.
    pub async fn stop(&self) {
        let cancel = std::mem::replace(&mut *self.cancel.lock(), CancellationToken::new());
        cancel.cancel();

        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Poll task ended abnormally");
            }
        }
        tracing::debug!("Polling stopped");
    }

    /// Returns `true` while background tasks are running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.lock().iter().any(|task| !task.is_finished())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the settings the hub was set up with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the listed appliances.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Returns one appliance.
    #[must_use]
    pub fn device(&self, device_id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id() == device_id)
    }

    /// Returns the current snapshot of an appliance's controls.
    #[must_use]
    pub fn snapshot(&self, device_id: &DeviceId) -> Option<Arc<DeviceControls>> {
        self.registry.snapshot(device_id)
    }

    /// Returns the current state of one control.
    #[must_use]
    pub fn control(&self, identity: &ControlIdentity) -> Option<Control> {
        self.registry.get(identity)
    }

    /// Returns one control with its pending flag.
    #[must_use]
    pub fn control_entry(&self, identity: &ControlIdentity) -> Option<ControlEntry> {
        self.registry.entry(identity)
    }

    /// Returns the resolved state of a door control.
    #[must_use]
    pub fn door_state(&self, identity: &ControlIdentity) -> DoorState {
        self.doors.get(identity)
    }

    /// Returns the brightness scale of an appliance.
    #[must_use]
    pub fn brightness_scale(&self, device_id: &DeviceId) -> BrightnessScale {
        self.pipeline.brightness_scale(device_id)
    }

    /// Describes every exposable control of every appliance.
    #[must_use]
    pub fn entities(&self) -> Vec<EntityDescriptor> {
        let mut entities = Vec::new();
        for device in &self.devices {
            let Some(snapshot) = self.registry.snapshot(device.id()) else {
                continue;
            };
            entities.extend(
                snapshot
                    .controls()
                    .filter_map(|c| describe(device, c, &self.settings, &self.zone_names)),
            );
        }
        entities
    }

    /// Returns when an appliance's controls were last fetched.
    #[must_use]
    pub fn last_updated(&self, device_id: &DeviceId) -> Option<DateTime<Utc>> {
        self.registry.snapshot(device_id).map(|s| s.fetched_at())
    }

    /// Returns `true` if the appliance is polled and its last poll succeeded.
    #[must_use]
    pub fn is_available(&self, device_id: &DeviceId) -> bool {
        self.scheduler_for(device_id)
            .is_some_and(|s| s.is_available(device_id))
    }

    /// Returns the state of the scheduler polling an appliance.
    #[must_use]
    pub fn scheduler_state(&self, device_id: &DeviceId) -> Option<SchedulerState> {
        self.scheduler_for(device_id).map(|s| s.state())
    }

    /// Returns the effective poll interval, or the configured one if no
    /// appliance is polled.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.schedulers
            .first()
            .map_or_else(|| self.settings.poll_interval(), |s| s.interval())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Validates and sends a command.
    ///
    /// # Errors
    ///
    /// See [`CommandPipeline::submit`].
    pub async fn submit(&self, identity: &ControlIdentity, command: ControlCommand) -> Result<CommandOutcome> {
        self.pipeline.submit(identity, command).await
    }

    /// Sends a command, waits its settle delay, then refreshes the appliance.
    ///
    /// A failed or skipped refresh does not fail the command; the optimistic
    /// value stays until the next poll.
    ///
    /// # Errors
    ///
    /// See [`CommandPipeline::submit`].
    pub async fn submit_and_refresh(
        &self,
        identity: &ControlIdentity,
        command: ControlCommand,
    ) -> Result<CommandOutcome> {
        let outcome = self.pipeline.submit(identity, command).await?;

        if let Some(delay) = outcome.settle_delay() {
            tokio::time::sleep(delay).await;
        }
        match self.refresh(identity.device_id()).await {
            Ok(TickOutcome::Skipped) => {
                tracing::debug!(control = %identity, "Refresh after command skipped");
            }
            Ok(TickOutcome::Updated { .. }) => {}
            Err(e) => {
                tracing::debug!(control = %identity, error = %e, "Refresh after command failed");
            }
        }

        Ok(outcome)
    }

    /// Fetches one appliance now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown appliance, otherwise
    /// see [`PollScheduler::refresh`].
    pub async fn refresh(&self, device_id: &DeviceId) -> Result<TickOutcome> {
        let scheduler = self
            .scheduler_for(device_id)
            .ok_or_else(|| Error::DeviceNotFound(device_id.clone()))?;
        scheduler.refresh(device_id).await
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Returns the callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &Arc<CallbackRegistry> {
        self.notifier.callbacks()
    }

    /// Subscribes to appliance events.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<ApplianceEvent> {
        self.notifier.events().subscribe()
    }

    fn scheduler_for(&self, device_id: &DeviceId) -> Option<&Arc<PollScheduler<A>>> {
        self.schedulers.iter().find(|s| s.polls(device_id))
    }
}

impl<A> Drop for ApplianceHub<A> {
    fn drop(&mut self) {
        self.cancel.get_mut().cancel();
    }
}

impl<A> std::fmt::Debug for ApplianceHub<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplianceHub")
            .field("devices", &self.devices.len())
            .field("schedulers", &self.schedulers.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
