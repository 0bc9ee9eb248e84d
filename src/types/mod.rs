// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for appliance controls.
//!
//! Each type parses the HomeAPI's string representation and rejects
//! anything it does not know with a [`ValueError`](crate::error::ValueError).
//!
//! # Types
//!
//! - [`DoorPosition`] - Raw auto-door position (CLOSED/OPEN/MOVING)
//! - [`HydroBreezeMode`] - Fan speed (OFF/LOW/MEDIUM/HIGH)
//! - [`IceMakerMode`] - Ice maker mode (ON/OFF/MAX_ICE)
//! - [`ZonePosition`] - Compartment position (top/middle/bottom)

mod door;
mod fan;
mod ice_maker;
mod zone;

pub use door::DoorPosition;
pub use fan::HydroBreezeMode;
pub use ice_maker::IceMakerMode;
pub use zone::ZonePosition;
