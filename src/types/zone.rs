// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone positions inside an appliance.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Physical position of a zone, used for naming only.
///
/// Controls scoped to the whole appliance carry no position at all
/// (`Option<ZonePosition>::None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZonePosition {
    /// Upper compartment.
    Top,
    /// Middle compartment.
    Middle,
    /// Lower compartment.
    Bottom,
}

impl ZonePosition {
    /// Returns the lowercase HomeAPI string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for ZonePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZonePosition {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ValueError::InvalidMode {
                kind: "zone position",
                value: s.to_string(),
            }),
        }
    }
}
