// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runtime settings consumed at setup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::scheduler::{DEFAULT_POLL_INTERVAL, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL};

/// How presentation lights are exposed to front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightExposure {
    /// A dimmable light with 0-255 brightness.
    #[default]
    Light,
    /// A numeric level input (0 to the model's maximum).
    Number,
}

/// Which observers fire after a successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyGranularity {
    /// Only callbacks of controls whose value changed.
    #[default]
    PerControl,
    /// Every callback of the device, on every successful poll.
    Device,
}

/// How devices are assigned to schedulers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStrategy {
    /// One scheduler task per device.
    #[default]
    PerDevice,
    /// A single task polling devices one after another.
    Sequential,
}

/// Settings for an [`ApplianceHub`](crate::manager::ApplianceHub).
///
/// # Examples
///
/// ```
/// use liebherr_lib::config::{LightExposure, Settings};
/// use std::time::Duration;
///
/// let settings = Settings::default()
///     .with_poll_interval(Duration::from_secs(60))
///     .with_light_exposure(LightExposure::Number);
/// assert!(settings.validate().is_ok());
///
/// let settings: Settings = serde_json::from_str(r#"{"poll_interval": 2}"#).unwrap();
/// assert!(settings.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base poll interval in seconds.
    #[serde(rename = "poll_interval")]
    pub poll_interval_secs: u64,
    /// Presentation light exposure.
    #[serde(rename = "presentation_light")]
    pub light_exposure: LightExposure,
    /// Observer notification granularity.
    pub notify: NotifyGranularity,
    /// Scheduler layout.
    pub poll_strategy: PollStrategy,
}

impl Settings {
    /// Sets the base poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_secs = interval.as_secs();
        self
    }

    /// Sets the presentation light exposure.
    #[must_use]
    pub fn with_light_exposure(mut self, exposure: LightExposure) -> Self {
        self.light_exposure = exposure;
        self
    }

    /// Sets the notification granularity.
    #[must_use]
    pub fn with_notify(mut self, notify: NotifyGranularity) -> Self {
        self.notify = notify;
        self
    }

    /// Sets the scheduler layout.
    #[must_use]
    pub fn with_poll_strategy(mut self, strategy: PollStrategy) -> Self {
        self.poll_strategy = strategy;
        self
    }

    /// Returns the base poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Checks the poll interval against the API's documented bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::OutOfRange`] if the interval is outside
    /// `[5, 300]` seconds.
    pub fn validate(&self) -> Result<(), ValueError> {
        let min = MIN_POLL_INTERVAL.as_secs();
        let max = MAX_POLL_INTERVAL.as_secs();
        if !(min..=max).contains(&self.poll_interval_secs) {
            return Err(ValueError::OutOfRange {
                min: i64::try_from(min).unwrap_or(i64::MAX),
                max: i64::try_from(max).unwrap_or(i64::MAX),
                actual: i64::try_from(self.poll_interval_secs).unwrap_or(i64::MAX),
            });
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            light_exposure: LightExposure::default(),
            notify: NotifyGranularity::default(),
            poll_strategy: PollStrategy::default(),
        }
    }
}
