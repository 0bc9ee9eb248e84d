// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type-specific control values.

use crate::types::{DoorPosition, HydroBreezeMode, IceMakerMode};

/// The value-bearing part of a control.
///
/// This is the only part compared when diffing snapshots, and the only part
/// an optimistic patch overwrites.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    /// Measured and requested temperature, in the control's unit.
    Temperature {
        /// Current measured temperature.
        current: Option<i32>,
        /// Requested temperature.
        target: Option<i32>,
    },
    /// Raw door position.
    Door(DoorPosition),
    /// On/off switch.
    Toggle(bool),
    /// Fan mode.
    HydroBreeze(HydroBreezeMode),
    /// Discrete light level; 0 means off.
    PresentationLight(u8),
    /// Ice maker mode.
    IceMaker(IceMakerMode),
    /// BioFresh-Plus mode, upper-cased.
    BioFreshPlus(String),
    /// Payload of a control family without a dedicated representation.
    Raw(serde_json::Value),
}

impl ControlValue {
    /// Returns the target temperature, if this is a temperature value.
    #[must_use]
    pub fn target_temperature(&self) -> Option<i32> {
        match self {
            Self::Temperature { target, .. } => *target,
            _ => None,
        }
    }

    /// Returns the door position, if this is a door value.
    #[must_use]
    pub fn door_position(&self) -> Option<DoorPosition> {
        match self {
            Self::Door(position) => Some(*position),
            _ => None,
        }
    }

    /// Returns the switch state, if this is a toggle value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Toggle(on) => Some(*on),
            _ => None,
        }
    }

    /// Returns the selected option string for select-like families.
    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        match self {
            Self::IceMaker(mode) => Some(mode.as_str()),
            Self::BioFreshPlus(mode) => Some(mode),
            _ => None,
        }
    }
}
