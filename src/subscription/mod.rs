// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for control changes.
//!
//! Front ends register closures and receive a [`SubscriptionId`] to cancel
//! them later. Nothing here depends on a host framework's entity lifecycle.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - Handle used to unsubscribe
//! - [`CallbackRegistry`] - Stores callbacks and dispatches updates
//! - [`Notifier`] - Fans each outcome out to callbacks and the event bus
//!
//! # Usage
//!
//! ```no_run
//! use liebherr_lib::manager::ApplianceHub;
//! use liebherr_lib::protocol::HttpClient;
//! use liebherr_lib::config::Settings;
//! use std::sync::Arc;
//!
//! # async fn example() -> liebherr_lib::Result<()> {
//! let api = Arc::new(HttpClient::new("my-api-key")?);
//! let hub = ApplianceHub::setup(api, Settings::default()).await?;
//!
//! let sub_id = hub.callbacks().on_device_changed(|update| {
//!     println!("{} changed {} controls", update.device_id, update.changes.len());
//! });
//!
//! // Later, unsubscribe
//! hub.callbacks().unsubscribe(sub_id);
//! # Ok(())
//! # }
//! ```

mod callback;
mod notifier;

pub use callback::{CallbackRegistry, DeviceUpdate, SubscriptionId, UpdateFailure};
pub use notifier::Notifier;
