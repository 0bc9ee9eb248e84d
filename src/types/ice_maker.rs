// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ice maker modes.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating mode of an ice maker.
///
/// `MaxIce` is only offered by appliances that report `hasMaxIce`.
///
/// # Examples
///
/// ```
/// use liebherr_lib::types::IceMakerMode;
///
/// assert_eq!(IceMakerMode::options(false).len(), 2);
/// assert_eq!(IceMakerMode::options(true).len(), 3);
/// assert_eq!(IceMakerMode::MaxIce.as_str(), "MAX_ICE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IceMakerMode {
    /// Ice production on.
    On,
    /// Ice production off.
    Off,
    /// Boosted ice production.
    MaxIce,
}

impl IceMakerMode {
    const BASIC: [Self; 2] = [Self::On, Self::Off];
    const EXTENDED: [Self; 3] = [Self::On, Self::Off, Self::MaxIce];

    /// Returns the modes an ice maker offers.
    #[must_use]
    pub fn options(has_max_ice: bool) -> &'static [Self] {
        if has_max_ice {
            &Self::EXTENDED
        } else {
            &Self::BASIC
        }
    }

    /// Returns the HomeAPI string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::MaxIce => "MAX_ICE",
        }
    }
}

impl fmt::Display for IceMakerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IceMakerMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            "MAX_ICE" => Ok(Self::MaxIce),
            _ => Err(ValueError::InvalidMode {
                kind: "ice maker",
                value: s.to_string(),
            }),
        }
    }
}
