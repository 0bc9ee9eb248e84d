// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed to percentage mapping.
//!
//! Running speeds are spread over equal-width percentage buckets; item `i`
//! of `n` owns the bucket ending at `(i + 1) * 100 / n`. Percentage 0 is
//! always off.

use crate::types::HydroBreezeMode;

/// Returns the percentage of an item in an ordered list.
///
/// Returns `None` if the item is not in the list.
///
/// # Examples
///
/// ```
/// use liebherr_lib::resolver::ordered_list_item_to_percentage;
///
/// let speeds = ["low", "medium", "high"];
/// assert_eq!(ordered_list_item_to_percentage(&speeds, &"medium"), Some(66));
/// assert_eq!(ordered_list_item_to_percentage(&speeds, &"high"), Some(100));
/// ```
#[must_use]
pub fn ordered_list_item_to_percentage<T: PartialEq>(list: &[T], item: &T) -> Option<u8> {
    let position = list.iter().position(|candidate| candidate == item)?;
    bucket_end(position, list.len())
}

/// Returns the first item whose bucket contains `percentage`.
///
/// Percentages above 100 select the last item. Returns `None` for an empty
/// list.
#[must_use]
pub fn percentage_to_ordered_list_item<T: Clone>(list: &[T], percentage: u8) -> Option<T> {
    let len = list.len();
    list.iter()
        .enumerate()
        .find(|(i, _)| bucket_end(*i, len).is_some_and(|end| percentage <= end))
        .map(|(_, item)| item.clone())
        .or_else(|| list.last().cloned())
}

fn bucket_end(index: usize, len: usize) -> Option<u8> {
    if len == 0 {
        return None;
    }
    u8::try_from((index + 1) * 100 / len).ok()
}

/// Maps a fan mode to its percentage; `Off` is 0.
#[must_use]
pub fn mode_to_percentage(mode: HydroBreezeMode) -> u8 {
    if mode.is_on() {
        ordered_list_item_to_percentage(&HydroBreezeMode::SPEEDS, &mode).unwrap_or(0)
    } else {
        0
    }
}

/// Maps a percentage to the enclosing fan mode; 0 is `Off`.
#[must_use]
pub fn percentage_to_mode(percentage: u8) -> HydroBreezeMode {
    if percentage == 0 {
        return HydroBreezeMode::Off;
    }
    percentage_to_ordered_list_item(&HydroBreezeMode::SPEEDS, percentage)
        .unwrap_or(HydroBreezeMode::High)
}

/// Number of running speeds.
#[must_use]
pub fn speed_count() -> usize {
    HydroBreezeMode::SPEEDS.len()
}
