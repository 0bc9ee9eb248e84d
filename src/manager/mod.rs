// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orchestration of all appliances of one account.
//!
//! The [`ApplianceHub`] wires the pieces together:
//!
//! - lists the appliances and performs their first refresh
//! - runs one poll scheduler per appliance (or one sequential scheduler)
//! - routes commands through the command pipeline
//! - exposes snapshots, door states, entity descriptors and subscriptions
//!
//! # Examples
//!
//! ## Watching events
//!
//! ```no_run
//! use std::sync::Arc;
//! use liebherr_lib::config::Settings;
//! use liebherr_lib::event::ApplianceEvent;
//! use liebherr_lib::manager::ApplianceHub;
//! use liebherr_lib::protocol::HttpClient;
//!
//! # async fn example() -> liebherr_lib::Result<()> {
//! let hub = ApplianceHub::setup(Arc::new(HttpClient::new("my-api-key")?), Settings::default()).await?;
//! let mut events = hub.subscribe_events();
//! hub.start();
//!
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         ApplianceEvent::ControlsChanged { device_id, changes } => {
//!             println!("{device_id}: {} controls changed", changes.len());
//!         }
//!         ApplianceEvent::Unavailable { device_id } => {
//!             println!("{device_id} needs re-authentication");
//!             break;
//!         }
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod hub;

pub use hub::ApplianceHub;
