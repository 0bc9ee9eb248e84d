// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `liebherr_lib` - keeps a local mirror of Liebherr SmartDevice appliances.
//!
//! The HomeAPI only supports polling. This library polls each appliance on a
//! rate-limit-aware schedule, reconciles the returned controls into an
//! in-memory registry, derives state the API does not report directly (door
//! direction, brightness and fan percentages), validates and sends control
//! writes, and notifies subscribers of what changed.
//!
//! # Supported Controls
//!
//! - **Temperature**: per-zone target temperature within the reported bounds
//! - **Auto door**: open/close, with direction inferred from consecutive polls
//! - **Toggles**: SuperCool, SuperFrost, party mode, night mode
//! - **HydroBreeze**: fan modes mapped to percentages
//! - **Presentation light**: model-specific levels mapped to 0-255
//! - **Ice maker** and **BioFresh-Plus**: mode selection
//! - Anything else is kept as a read-only raw value
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use liebherr_lib::ControlType;
//! use liebherr_lib::command::ControlCommand;
//! use liebherr_lib::config::Settings;
//! use liebherr_lib::manager::ApplianceHub;
//! use liebherr_lib::protocol::HttpClient;
//!
//! #[tokio::main]
//! async fn main() -> liebherr_lib::Result<()> {
//!     let api = Arc::new(HttpClient::new("my-api-key")?);
//!     let hub = ApplianceHub::setup(api, Settings::default()).await?;
//!
//!     hub.callbacks().on_device_changed(|update| {
//!         println!("{}: {} changed", update.device_id, update.changes.len());
//!     });
//!     hub.start();
//!
//!     for device in hub.devices() {
//!         let Some(controls) = hub.snapshot(device.id()) else { continue };
//!         for (id, _) in controls.of_type(&ControlType::Temperature) {
//!             hub.submit_and_refresh(id, ControlCommand::SetTemperature(4)).await?;
//!         }
//!     }
//!
//!     hub.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Custom Transport
//!
//! The polling core only talks to the [`ApplianceApi`](protocol::ApplianceApi)
//! trait; disable the default `http` feature to bring your own client.

pub mod command;
pub mod config;
pub mod control;
pub mod device;
pub mod entity;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod registry;
pub mod resolver;
pub mod response;
pub mod scheduler;
pub mod subscription;
pub mod types;

pub use command::{CommandOutcome, ControlCommand, ControlRequest};
pub use config::{LightExposure, NotifyGranularity, PollStrategy, Settings};
pub use control::{Control, ControlBounds, ControlIdentity, ControlType, ControlValue};
pub use device::{Device, DeviceId, DeviceType};
pub use entity::{EntityDescriptor, EntityKind};
pub use error::{ApiError, Error, ErrorKind, ParseError, Result, ValueError};
pub use manager::ApplianceHub;
pub use protocol::ApplianceApi;
pub use registry::{ControlChange, ControlRegistry};
pub use resolver::{BrightnessScale, DoorState};
pub use scheduler::{PollScheduler, SchedulerState};
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use types::{DoorPosition, HydroBreezeMode, IceMakerMode, ZonePosition};
