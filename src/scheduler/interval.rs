// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared poll interval arithmetic.

use std::time::Duration;

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest interval accepted, and the minimum average spacing of fetches
/// across the account.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Longest interval accepted.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Splits a base interval across `device_count` devices.
///
/// With zero or one device the base is returned unchanged. Otherwise the
/// result is `base / device_count` rounded to the nearest second (halves
/// round up), never below `min` and never above [`MAX_POLL_INTERVAL`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use liebherr_lib::scheduler::compute_interval;
///
/// let base = Duration::from_secs(30);
/// let min = Duration::from_secs(5);
/// assert_eq!(compute_interval(base, min, 1), base);
/// assert_eq!(compute_interval(base, min, 3), Duration::from_secs(10));
/// assert_eq!(compute_interval(base, min, 10), min);
/// ```
#[must_use]
pub fn compute_interval(base: Duration, min: Duration, device_count: usize) -> Duration {
    if device_count <= 1 {
        return base;
    }

    let count = u64::try_from(device_count).unwrap_or(u64::MAX);
    let base_secs = base.as_secs();
    let split = base_secs
        .saturating_mul(2)
        .saturating_add(count)
        / count.saturating_mul(2);

    Duration::from_secs(split).max(min).min(MAX_POLL_INTERVAL)
}

/// Interval for each of `device_count` independent per-device schedulers.
///
/// Each scheduler keeps the base interval, raised to `device_count * min`
/// when needed, so the account as a whole never averages more than one
/// fetch per `min`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use liebherr_lib::scheduler::per_device_interval;
///
/// let base = Duration::from_secs(30);
/// let min = Duration::from_secs(5);
/// assert_eq!(per_device_interval(base, min, 2), base);
/// assert_eq!(per_device_interval(base, min, 10), Duration::from_secs(50));
/// ```
#[must_use]
pub fn per_device_interval(base: Duration, min: Duration, device_count: usize) -> Duration {
    let count = u32::try_from(device_count).unwrap_or(u32::MAX);
    base.max(min.saturating_mul(count))
}
