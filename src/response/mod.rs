// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for HomeAPI JSON bodies.
//!
//! This module provides the wire structures for the appliance listing and
//! the per-device control listing, and their conversion into [`Device`] and
//! [`Control`].
//!
//! [`Device`]: crate::Device
//! [`Control`]: crate::Control

mod control;
mod device;

pub use control::{ControlResponse, parse_controls};
pub use device::{DeviceResponse, parse_devices};
