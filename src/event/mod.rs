// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast events for async consumers.
//!
//! The [`EventBus`] mirrors the callback fan-out of
//! [`subscription`](crate::subscription) over a tokio broadcast channel, for
//! consumers that prefer awaiting a receiver to registering closures.
//!
//! # Examples
//!
//! ```
//! use liebherr_lib::DeviceId;
//! use liebherr_lib::event::{ApplianceEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//! bus.publish(ApplianceEvent::controls_changed(DeviceId::new("942007"), vec![]));
//! ```

mod appliance_event;
mod event_bus;

pub use appliance_event::ApplianceEvent;
pub use event_bus::EventBus;
