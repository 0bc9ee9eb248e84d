// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controls exposed by an appliance.
//!
//! A control is one independently addressable attribute or actuator of a
//! device: a temperature zone, a door, a switch, a light, a fan, a mode
//! selector. Each family carries its own value shape ([`ControlValue`]) and
//! bounds ([`ControlBounds`]).
//!
//! Families this library does not know are kept as [`ControlType::Other`]
//! with a [`ControlValue::Raw`] payload, so new controls surface without an
//! update.

mod identity;
mod value;

use std::fmt;

pub use identity::ControlIdentity;
pub use value::ControlValue;

use crate::device::DeviceId;
use crate::types::ZonePosition;

/// Control family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlType {
    /// Zone temperature.
    Temperature,
    /// Motorised door.
    AutoDoor,
    /// Named on/off switch (SuperCool, SuperFrost, party mode, night mode).
    Toggle,
    /// HydroBreeze fan.
    HydroBreeze,
    /// Presentation light.
    PresentationLight,
    /// Ice maker.
    IceMaker,
    /// BioFresh-Plus compartment mode.
    BioFreshPlus,
    /// Read-only control of an unrecognised family, keyed by its API type.
    Other(String),
}

impl ControlType {
    /// Maps the HomeAPI `type` discriminator.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value {
            "TemperatureControl" => Self::Temperature,
            "AutoDoorControl" => Self::AutoDoor,
            "ToggleControl" => Self::Toggle,
            "HydroBreezeControl" => Self::HydroBreeze,
            "PresentationLightControl" => Self::PresentationLight,
            "IceMakerControl" => Self::IceMaker,
            "BioFreshPlusControl" => Self::BioFreshPlus,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the HomeAPI `type` discriminator.
    #[must_use]
    pub fn as_api_str(&self) -> &str {
        match self {
            Self::Temperature => "TemperatureControl",
            Self::AutoDoor => "AutoDoorControl",
            Self::Toggle => "ToggleControl",
            Self::HydroBreeze => "HydroBreezeControl",
            Self::PresentationLight => "PresentationLightControl",
            Self::IceMaker => "IceMakerControl",
            Self::BioFreshPlus => "BioFreshPlusControl",
            Self::Other(s) => s,
        }
    }

    /// Default control name: the API type, lower-cased, without `Control`.
    #[must_use]
    pub fn default_name(&self) -> String {
        let api = self.as_api_str();
        api.strip_suffix("Control").unwrap_or(api).to_lowercase()
    }

    /// Returns `true` if commands can be sent to this family.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Declared bounds of a control.
///
/// Fields that do not apply to a family stay at their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlBounds {
    /// Minimum accepted numeric value.
    pub min: Option<i32>,
    /// Maximum accepted numeric value.
    pub max: Option<i32>,
    /// Unit of measurement (`°C`, `°F`).
    pub unit: Option<String>,
    /// Option set for mode controls.
    pub supported_modes: Vec<String>,
    /// Ice maker offers `MAX_ICE`.
    pub has_max_ice: bool,
}

/// Known toggle controls and how they are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSpec {
    /// Lower-case control name.
    pub name: &'static str,
    /// The write request carries a zone id.
    pub zoned: bool,
    /// Front-end icon.
    pub icon: &'static str,
}

impl ToggleSpec {
    const KNOWN: [Self; 4] = [
        Self {
            name: "supercool",
            zoned: true,
            icon: "mdi:snowflake",
        },
        Self {
            name: "superfrost",
            zoned: true,
            icon: "mdi:snowflake-variant",
        },
        Self {
            name: "partymode",
            zoned: false,
            icon: "mdi:party-popper",
        },
        Self {
            name: "nightmode",
            zoned: false,
            icon: "mdi:weather-night",
        },
    ];

    /// Icon used for toggles without a dedicated one.
    pub const DEFAULT_ICON: &'static str = "mdi:toggle-switch-variant";

    /// Looks up a toggle by name, ignoring case.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::KNOWN
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .copied()
    }
}

/// A single control as last reported by the HomeAPI.
///
/// # Examples
///
/// ```
/// use liebherr_lib::{Control, ControlType, ControlValue};
/// use liebherr_lib::types::ZonePosition;
///
/// let control = Control::new(
///     ControlType::Temperature,
///     "fridge",
///     ControlValue::Temperature { current: Some(5), target: Some(4) },
/// )
/// .with_zone(0, Some(ZonePosition::Top));
///
/// assert_eq!(control.zone_id(), 0);
/// assert_eq!(control.value().target_temperature(), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    control_type: ControlType,
    name: String,
    zone_id: u32,
    zone_position: Option<ZonePosition>,
    value: ControlValue,
    bounds: ControlBounds,
}

impl Control {
    /// Creates a whole-device control with default bounds.
    #[must_use]
    pub fn new(control_type: ControlType, name: impl Into<String>, value: ControlValue) -> Self {
        Self {
            control_type,
            name: name.into(),
            zone_id: 0,
            zone_position: None,
            value,
            bounds: ControlBounds::default(),
        }
    }

    /// Scopes the control to a zone.
    #[must_use]
    pub fn with_zone(mut self, zone_id: u32, position: Option<ZonePosition>) -> Self {
        self.zone_id = zone_id;
        self.zone_position = position;
        self
    }

    /// Sets the declared bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: ControlBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Returns the control family.
    #[must_use]
    pub fn control_type(&self) -> &ControlType {
        &self.control_type
    }

    /// Returns the control name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the zone identifier (0 = whole device).
    #[must_use]
    pub fn zone_id(&self) -> u32 {
        self.zone_id
    }

    /// Returns the zone position, if the control is zone-scoped.
    #[must_use]
    pub fn zone_position(&self) -> Option<ZonePosition> {
        self.zone_position
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    /// Returns the declared bounds.
    #[must_use]
    pub fn bounds(&self) -> &ControlBounds {
        &self.bounds
    }

    /// Builds the identity of this control within `device_id`.
    #[must_use]
    pub fn identity(&self, device_id: &DeviceId) -> ControlIdentity {
        ControlIdentity::new(
            device_id.clone(),
            self.control_type.clone(),
            self.zone_id,
            self.name.clone(),
        )
    }

    /// Overwrites the value and keeps everything else.
    pub(crate) fn set_value(&mut self, value: ControlValue) {
        self.value = value;
    }
}
