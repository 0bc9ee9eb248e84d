// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation light brightness scaling.
//!
//! Appliances accept a small discrete level range; front ends expect
//! 0-255. Scaling up rounds towards the higher level, scaling down floors,
//! so a round trip lands on the nearest valid level rather than the input.

/// Discrete brightness range of an appliance model.
///
/// # Examples
///
/// ```
/// use liebherr_lib::resolver::BrightnessScale;
///
/// let scale = BrightnessScale::for_model(Some("WPgbi 7472-20"));
/// assert_eq!(scale.brightness_to_level(255), 5);
/// assert_eq!(scale.level_to_brightness(0), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessScale {
    min: u8,
    max: u8,
}

impl BrightnessScale {
    /// Range used when the model is not listed.
    pub const DEFAULT: Self = Self { min: 1, max: 4 };

    const BY_MODEL: [(&'static str, Self); 1] = [("WPgbi 7472-20", Self { min: 1, max: 5 })];

    /// Creates a scale, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(min: u8, max: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min: min.max(1), max: max.max(1) }
    }

    /// Looks up the range for a model string.
    #[must_use]
    pub fn for_model(model: Option<&str>) -> Self {
        model
            .and_then(|m| {
                Self::BY_MODEL
                    .iter()
                    .find(|(name, _)| *name == m)
                    .map(|(_, scale)| *scale)
            })
            .unwrap_or(Self::DEFAULT)
    }

    /// Returns the lowest "on" level.
    #[must_use]
    pub fn min(&self) -> u8 {
        self.min
    }

    /// Returns the highest level.
    #[must_use]
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Number of distinct "on" levels.
    #[must_use]
    pub fn states(&self) -> u32 {
        u32::from(self.max - self.min) + 1
    }

    /// Maps a device level to 0-255. Level 0 is off.
    #[must_use]
    pub fn level_to_brightness(&self, level: u8) -> u8 {
        if level == 0 {
            return 0;
        }
        let level = level.clamp(self.min, self.max);
        let steps = u32::from(level) - (u32::from(self.min) - 1);
        let value = steps * 255 / self.states();
        u8::try_from(value).unwrap_or(u8::MAX)
    }

    /// Maps 0-255 to the nearest device level. Brightness 0 is off.
    #[must_use]
    pub fn brightness_to_level(&self, brightness: u8) -> u8 {
        if brightness == 0 {
            return 0;
        }
        let steps = (u32::from(brightness) * self.states()).div_ceil(255);
        let level = steps + u32::from(self.min) - 1;
        u8::try_from(level)
            .unwrap_or(self.max)
            .clamp(self.min, self.max)
    }

    /// Returns `true` if `level` means the light is on.
    #[must_use]
    pub fn is_on(level: u8) -> bool {
        level > 0
    }
}

impl Default for BrightnessScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_lookup() {
        assert_eq!(
            BrightnessScale::for_model(Some("WPgbi 7472-20")),
            BrightnessScale::new(1, 5)
        );
        assert_eq!(
            BrightnessScale::for_model(Some("CBNbsd 578i")),
            BrightnessScale::DEFAULT
        );
        assert_eq!(BrightnessScale::for_model(None), BrightnessScale::DEFAULT);
    }

    #[test]
    fn full_brightness_is_top_level() {
        let scale = BrightnessScale::new(1, 5);
        assert_eq!(scale.brightness_to_level(255), 5);
        assert_eq!(scale.level_to_brightness(5), 255);
    }

    #[test]
    fn zero_is_off_both_ways() {
        let scale = BrightnessScale::new(1, 5);
        assert_eq!(scale.level_to_brightness(0), 0);
        assert!(!BrightnessScale::is_on(scale.brightness_to_level(0)));
    }

    #[test]
    fn lowest_brightness_is_lowest_level() {
        let scale = BrightnessScale::DEFAULT;
        assert_eq!(scale.brightness_to_level(1), 1);
        assert_eq!(scale.level_to_brightness(1), 63);
    }

    #[test]
    fn round_trip_lands_on_nearest_level() {
        let scale = BrightnessScale::new(1, 5);
        for level in 1..=5 {
            let brightness = scale.level_to_brightness(level);
            assert_eq!(scale.brightness_to_level(brightness), level);
        }

        // 100/255 sits between level 1 (51) and level 2 (102); rounding up picks 2.
        let level = scale.brightness_to_level(100);
        assert_eq!(level, 2);
        assert_eq!(scale.level_to_brightness(level), 102);
    }

    #[test]
    fn out_of_range_level_is_clamped() {
        let scale = BrightnessScale::DEFAULT;
        assert_eq!(scale.level_to_brightness(9), 255);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let scale = BrightnessScale::new(5, 1);
        assert_eq!(scale.min(), 1);
        assert_eq!(scale.max(), 5);
    }
}
