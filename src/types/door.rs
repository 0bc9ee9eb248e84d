// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw door position as reported by the HomeAPI.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Instantaneous door position reported by an auto-door control.
///
/// The HomeAPI only reports where the door is, never which way it is
/// moving. Direction is inferred by [`DoorState`](crate::resolver::DoorState).
///
/// # Examples
///
/// ```
/// use liebherr_lib::types::DoorPosition;
///
/// let pos: DoorPosition = "MOVING".parse().unwrap();
/// assert_eq!(pos, DoorPosition::Moving);
/// assert_eq!(pos.as_str(), "MOVING");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorPosition {
    /// Door is fully closed.
    Closed,
    /// Door is fully open.
    Open,
    /// Door is between the two end positions.
    Moving,
}

impl DoorPosition {
    /// Returns the HomeAPI string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
            Self::Moving => "MOVING",
        }
    }
}

impl fmt::Display for DoorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoorPosition {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CLOSED" => Ok(Self::Closed),
            "OPEN" => Ok(Self::Open),
            "MOVING" => Ok(Self::Moving),
            _ => Err(ValueError::InvalidMode {
                kind: "door",
                value: s.to_string(),
            }),
        }
    }
}
