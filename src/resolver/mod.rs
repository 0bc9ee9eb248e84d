// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derived state for controls whose raw value needs interpretation.
//!
//! - [`DoorState`] / [`DoorTracker`]: door direction inferred from
//!   consecutive positions, held in a side-table keyed by control identity
//! - [`BrightnessScale`]: discrete light levels to 0-255 and back
//! - [`percentage_to_mode`] / [`mode_to_percentage`]: fan modes to
//!   percentage buckets

mod brightness;
mod door;
mod fan;

pub use brightness::BrightnessScale;
pub use door::{DoorState, DoorTracker};
pub use fan::{
    mode_to_percentage, ordered_list_item_to_percentage, percentage_to_mode,
    percentage_to_ordered_list_item, speed_count,
};
