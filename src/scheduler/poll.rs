// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll scheduler state machine and run loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::control::{ControlType, ControlValue};
use crate::device::DeviceId;
use crate::error::{Error, ErrorKind, Result};
use crate::protocol::ApplianceApi;
use crate::registry::ControlRegistry;
use crate::resolver::DoorTracker;
use crate::subscription::Notifier;

/// State of a [`PollScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Waiting for the next tick.
    #[default]
    Idle,
    /// A fetch is in flight; overlapping requests are skipped.
    Fetching,
    /// The last fetch was rate limited; only the next scheduled tick retries.
    Backoff,
    /// Authentication failed; no further fetch will be made.
    Halted,
}

impl SchedulerState {
    /// Returns the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Backoff => "backoff",
            Self::Halted => "halted",
        }
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one tick that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Controls were fetched and swapped in.
    Updated {
        /// Number of changed identities (zero is a silent success).
        changed: usize,
    },
    /// The tick was not run: a fetch was already in flight, or an
    /// out-of-band refresh was requested during backoff.
    Skipped,
}

/// Resets `Fetching` to `Idle` if a fetch future is dropped midway.
struct FetchGuard<'a> {
    state: &'a Mutex<SchedulerState>,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if *state == SchedulerState::Fetching {
            *state = SchedulerState::Idle;
        }
    }
}

/// Polls one or more devices and feeds results into the registry.
///
/// A scheduler never runs two fetches at once. With several devices it polls
/// them one after another, waiting the inter-device delay in between.
pub struct PollScheduler<A> {
    devices: Vec<DeviceId>,
    api: Arc<A>,
    registry: Arc<ControlRegistry>,
    doors: Arc<DoorTracker>,
    notifier: Notifier,
    interval: Mutex<Duration>,
    inter_device_delay: Duration,
    state: Mutex<SchedulerState>,
    failing: Mutex<HashSet<DeviceId>>,
}

impl<A: ApplianceApi> PollScheduler<A> {
    /// Creates a scheduler for `devices`, polling every `interval`.
    #[must_use]
    pub fn new(
        devices: Vec<DeviceId>,
        api: Arc<A>,
        registry: Arc<ControlRegistry>,
        doors: Arc<DoorTracker>,
        notifier: Notifier,
        interval: Duration,
    ) -> Self {
        Self {
            devices,
            api,
            registry,
            doors,
            notifier,
            interval: Mutex::new(interval),
            inter_device_delay: Duration::ZERO,
            state: Mutex::new(SchedulerState::Idle),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Sets the pause between two devices of the same round.
    #[must_use]
    pub fn with_inter_device_delay(mut self, delay: Duration) -> Self {
        self.inter_device_delay = delay;
        self
    }

    /// Returns the polled devices.
    #[must_use]
    pub fn device_ids(&self) -> &[DeviceId] {
        &self.devices
    }

    /// Returns `true` if this scheduler polls `device_id`.
    #[must_use]
    pub fn polls(&self, device_id: &DeviceId) -> bool {
        self.devices.contains(device_id)
    }

    /// Returns the current poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        *self.interval.lock()
    }

    /// Changes the poll interval; takes effect from the next wait.
    pub fn set_interval(&self, interval: Duration) {
        *self.interval.lock() = interval;
    }

    /// Returns the pause between two devices of the same round.
    #[must_use]
    pub fn inter_device_delay(&self) -> Duration {
        self.inter_device_delay
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Returns `true` if the device is not halted and its last tick succeeded.
    #[must_use]
    pub fn is_available(&self, device_id: &DeviceId) -> bool {
        self.state() != SchedulerState::Halted && !self.failing.lock().contains(device_id)
    }

    /// Fetches one device now, outside the schedule.
    ///
    /// Skipped while a fetch is in flight or while backing off from a rate
    /// limit.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`Error::SchedulerHalted`] once
    /// authentication has failed.
    pub async fn refresh(&self, device_id: &DeviceId) -> Result<TickOutcome> {
        self.tick(device_id, false).await
    }

    /// Runs one scheduled round over every device.
    ///
    /// Transient failures are logged and notified, then the round moves on.
    /// Returns early if `cancel` fires during an inter-device wait.
    ///
    /// # Errors
    ///
    /// Returns the authentication error that halted the scheduler.
    pub async fn poll_round(&self, cancel: &CancellationToken) -> Result<()> {
        for (i, device_id) in self.devices.iter().enumerate() {
            if i > 0 && !self.inter_device_delay.is_zero() {
                tokio::select! {
                    () = cancel.cancelled() => return Ok(()),
                    () = tokio::time::sleep(self.inter_device_delay) => {}
                }
            }

            match self.tick(device_id, true).await {
                Err(e) if e.is_auth() => return Err(e),
                Ok(_) | Err(_) => {}
            }
        }
        Ok(())
    }

    /// Polls until cancelled or halted.
    ///
    /// Cancellation aborts a pending wait at once; a fetch already in flight
    /// completes and commits first.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        tracing::debug!(devices = self.devices.len(), "Poll scheduler started");

        loop {
            let interval = self.interval();
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }

            if self.poll_round(&cancel).await.is_err() {
                break;
            }
        }

        tracing::debug!(state = %self.state(), "Poll scheduler stopped");
    }

    async fn tick(&self, device_id: &DeviceId, scheduled: bool) -> Result<TickOutcome> {
        {
            let mut state = self.state.lock();
            match *state {
                SchedulerState::Halted => return Err(Error::SchedulerHalted(device_id.clone())),
                SchedulerState::Fetching => {
                    tracing::debug!(device_id = %device_id, "Fetch in flight, skipping");
                    return Ok(TickOutcome::Skipped);
                }
                SchedulerState::Backoff if !scheduled => {
                    tracing::debug!(device_id = %device_id, "Backing off, skipping refresh");
                    return Ok(TickOutcome::Skipped);
                }
                SchedulerState::Idle | SchedulerState::Backoff => {
                    *state = SchedulerState::Fetching;
                }
            }
        }
        let _guard = FetchGuard { state: &self.state };

        tracing::debug!(device_id = %device_id, "Fetching controls");
        match self.api.get_controls(device_id).await {
            Ok(controls) => Ok(self.commit(device_id, controls)),
            Err(e) => {
                self.fail(device_id, &e);
                Err(e)
            }
        }
    }

    fn commit(&self, device_id: &DeviceId, controls: Vec<crate::control::Control>) -> TickOutcome {
        let changes = self.registry.replace(device_id, controls);

        for change in &changes {
            let identity = change.identity();
            if *identity.control_type() != ControlType::AutoDoor {
                continue;
            }
            if change.is_added() {
                self.doors.track(identity);
            } else if change.is_removed() {
                self.doors.remove(identity);
            }
        }

        let snapshot = self.registry.snapshot(device_id);
        if let Some(snapshot) = &snapshot {
            for (identity, entry) in snapshot.iter() {
                if let ControlValue::Door(position) = entry.control().value() {
                    self.doors.observe(identity, *position);
                }
            }
        }

        self.failing.lock().remove(device_id);
        *self.state.lock() = SchedulerState::Idle;

        let changed = changes.len();
        if let Some(snapshot) = snapshot {
            self.notifier.controls_replaced(device_id, changes, snapshot);
        }
        TickOutcome::Updated { changed }
    }

    fn fail(&self, device_id: &DeviceId, error: &Error) {
        self.failing.lock().insert(device_id.clone());

        match error.kind() {
            ErrorKind::Auth => {
                tracing::error!(device_id = %device_id, "Invalid API key");
                *self.state.lock() = SchedulerState::Halted;
                for device in &self.devices {
                    self.notifier.unavailable(device);
                }
            }
            ErrorKind::RateLimit => {
                tracing::warn!(device_id = %device_id, error = %error, "API rate limit exceeded getting controls");
                *self.state.lock() = SchedulerState::Backoff;
                self.notifier.update_failed(device_id, error);
            }
            ErrorKind::Fetch | ErrorKind::Validation => {
                tracing::error!(device_id = %device_id, error = %error, "Error fetching controls");
                *self.state.lock() = SchedulerState::Idle;
                self.notifier.update_failed(device_id, error);
            }
        }
    }
}

impl<A> std::fmt::Debug for PollScheduler<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollScheduler")
            .field("devices", &self.devices)
            .field("interval", &*self.interval.lock())
            .field("inter_device_delay", &self.inter_device_delay)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}
