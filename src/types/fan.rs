// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HydroBreeze fan modes.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Speed mode of a HydroBreeze fan.
///
/// Modes are ordered; [`HydroBreezeMode::SPEEDS`] lists the non-off modes
/// from slowest to fastest and is the list used for percentage mapping.
///
/// # Examples
///
/// ```
/// use liebherr_lib::types::HydroBreezeMode;
///
/// assert_eq!("MEDIUM".parse::<HydroBreezeMode>().unwrap(), HydroBreezeMode::Medium);
/// assert_eq!("MED".parse::<HydroBreezeMode>().unwrap(), HydroBreezeMode::Medium);
/// assert!(HydroBreezeMode::Off < HydroBreezeMode::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HydroBreezeMode {
    /// Fan is off.
    Off,
    /// Lowest speed.
    Low,
    /// Middle speed.
    Medium,
    /// Highest speed.
    High,
}

impl HydroBreezeMode {
    /// Every mode, `Off` first.
    pub const ALL: [Self; 4] = [Self::Off, Self::Low, Self::Medium, Self::High];

    /// Running speeds in ascending order.
    pub const SPEEDS: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the HomeAPI string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Returns `true` unless the fan is off.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl fmt::Display for HydroBreezeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HydroBreezeMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "LOW" => Ok(Self::Low),
            "MEDIUM" | "MED" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(ValueError::InvalidMode {
                kind: "hydro breeze",
                value: s.to_string(),
            }),
        }
    }
}
