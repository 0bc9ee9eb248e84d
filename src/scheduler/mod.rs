// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic polling of appliance controls.
//!
//! A [`PollScheduler`] owns one or more devices and moves through
//! [`SchedulerState`]s on every tick:
//!
//! - success swaps the fetched controls into the registry, updates door
//!   directions and notifies observers
//! - a rate limit puts the scheduler into backoff until the next tick
//! - a generic failure is reported and polling continues
//! - an authentication failure halts the scheduler permanently
//!
//! [`compute_interval`] spaces the fetches of one shared round, and
//! [`per_device_interval`] slows independent per-device schedulers down so
//! the account never averages more than one fetch per [`MIN_POLL_INTERVAL`].

mod interval;
mod poll;

pub use interval::{
    DEFAULT_POLL_INTERVAL, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL, compute_interval,
    per_device_interval,
};
pub use poll::{PollScheduler, SchedulerState, TickOutcome};
