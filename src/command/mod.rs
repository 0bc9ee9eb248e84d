// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands for appliance controls.
//!
//! A [`ControlCommand`] is what a caller asks for ("set 4 °C", "50 % fan").
//! The [`CommandPipeline`] validates it against the target control's family
//! and bounds, turns it into a [`ControlRequest`] (the wire shape), sends it
//! and patches the registry optimistically.
//!
//! # Examples
//!
//! ```
//! use liebherr_lib::command::ControlCommand;
//! use liebherr_lib::types::HydroBreezeMode;
//!
//! let cmd = ControlCommand::SetFanMode(HydroBreezeMode::High);
//! assert_eq!(cmd.name(), "set_fan_mode");
//! ```

mod pipeline;
mod request;

pub use pipeline::{CommandOutcome, CommandPipeline, Prepared, prepare};
pub use request::{ControlRequest, SETTLE_DELAY};

use crate::types::HydroBreezeMode;

/// A requested change to one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Set the target temperature of a temperature zone.
    SetTemperature(i32),
    /// Switch a toggle on or off.
    SetToggle(bool),
    /// Open a motorised door.
    OpenDoor,
    /// Close a motorised door.
    CloseDoor,
    /// Select a fan mode.
    SetFanMode(HydroBreezeMode),
    /// Select the fan mode enclosing a percentage; 0 turns the fan off.
    SetFanPercentage(u8),
    /// Turn the fan on at the lowest speed.
    TurnOnFan,
    /// Set presentation light brightness on the 0-255 scale; 0 is off.
    SetBrightness(u8),
    /// Set the presentation light level directly.
    SetLightLevel(u8),
    /// Select an option of a mode control (ice maker, BioFresh-Plus).
    SelectOption(String),
}

impl ControlCommand {
    /// Returns the command name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetTemperature(_) => "set_temperature",
            Self::SetToggle(_) => "set_toggle",
            Self::OpenDoor => "open_door",
            Self::CloseDoor => "close_door",
            Self::SetFanMode(_) => "set_fan_mode",
            Self::SetFanPercentage(_) => "set_fan_percentage",
            Self::TurnOnFan => "turn_on_fan",
            Self::SetBrightness(_) => "set_brightness",
            Self::SetLightLevel(_) => "set_light_level",
            Self::SelectOption(_) => "select_option",
        }
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetTemperature(t) => write!(f, "{}({t})", self.name()),
            Self::SetToggle(on) => write!(f, "{}({on})", self.name()),
            Self::SetFanMode(mode) => write!(f, "{}({mode})", self.name()),
            Self::SetFanPercentage(v) | Self::SetBrightness(v) | Self::SetLightLevel(v) => {
                write!(f, "{}({v})", self.name())
            }
            Self::SelectOption(option) => write!(f, "{}({option})", self.name()),
            Self::OpenDoor | Self::CloseDoor | Self::TurnOnFan => f.write_str(self.name()),
        }
    }
}
