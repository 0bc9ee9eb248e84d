// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Front-end descriptors for controls.
//!
//! [`describe`] maps a control to the kind of entity a home automation
//! front end would show for it, together with a stable unique id, a display
//! name and an icon.

use std::collections::HashMap;

use crate::config::{LightExposure, Settings};
use crate::control::{Control, ControlIdentity, ControlType, ToggleSpec};
use crate::device::Device;
use crate::resolver::DoorState;
use crate::types::{HydroBreezeMode, ZonePosition};

/// Front-end entity kind of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Thermostat with a target temperature.
    Climate,
    /// Motorised door.
    Cover,
    /// On/off switch.
    Switch,
    /// Fan with discrete speeds.
    Fan,
    /// Dimmable light.
    Light,
    /// Numeric level input.
    Number,
    /// Option picker.
    Select,
    /// Read-only value.
    Sensor,
}

impl EntityKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Climate => "climate",
            Self::Cover => "cover",
            Self::Switch => "switch",
            Self::Fan => "fan",
            Self::Light => "light",
            Self::Number => "number",
            Self::Select => "select",
            Self::Sensor => "sensor",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one control is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Stable id, `liebherr_{device}_{control}_{zone}`.
    pub unique_id: String,
    /// Display name.
    pub name: String,
    /// Initial icon, if any.
    pub icon: Option<&'static str>,
    /// Entity kind.
    pub kind: EntityKind,
    /// Identity of the described control.
    pub identity: ControlIdentity,
}

/// Display names of zone positions.
///
/// Built once at startup and passed to [`describe`]; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneNames {
    names: HashMap<ZonePosition, String>,
}

impl ZoneNames {
    /// Creates a table from `(position, name)` pairs. Positions not listed
    /// fall back to the English name.
    #[must_use]
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ZonePosition, S)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (position, name) in entries {
            table.names.insert(position, name.into());
        }
        table
    }

    /// Returns the display name of a position.
    #[must_use]
    pub fn get(&self, position: ZonePosition) -> &str {
        self.names.get(&position).map_or("", String::as_str)
    }
}

impl Default for ZoneNames {
    fn default() -> Self {
        Self {
            names: HashMap::from([
                (ZonePosition::Top, "Top".to_string()),
                (ZonePosition::Middle, "Middle".to_string()),
                (ZonePosition::Bottom, "Bottom".to_string()),
            ]),
        }
    }
}

/// Icon of a door in a resolved state.
#[must_use]
pub const fn door_icon(state: DoorState) -> &'static str {
    match state {
        DoorState::Unknown | DoorState::Closed => "mdi:door",
        DoorState::Open | DoorState::Opening | DoorState::Closing => "mdi:door-open",
    }
}

/// Icon of a fan in a given mode.
#[must_use]
pub const fn fan_icon(mode: HydroBreezeMode) -> &'static str {
    if mode.is_on() { "mdi:fan" } else { "mdi:fan-off" }
}

/// Describes how a control is presented.
///
/// Returns `None` for controls that cannot be exposed: unknown toggles and
/// BioFresh-Plus controls without supported modes.
///
/// # Examples
///
/// ```
/// use liebherr_lib::config::Settings;
/// use liebherr_lib::control::{Control, ControlType, ControlValue};
/// use liebherr_lib::device::Device;
/// use liebherr_lib::entity::{EntityKind, ZoneNames, describe};
///
/// let device = Device::new("942007").with_name("Kitchen");
/// let control = Control::new(ControlType::Toggle, "supercool", ControlValue::Toggle(false));
///
/// let entity = describe(&device, &control, &Settings::default(), &ZoneNames::default()).unwrap();
/// assert_eq!(entity.kind, EntityKind::Switch);
/// assert_eq!(entity.unique_id, "liebherr_942007_supercool_0");
/// assert_eq!(entity.icon, Some("mdi:snowflake"));
/// ```
#[must_use]
pub fn describe(
    device: &Device,
    control: &Control,
    settings: &Settings,
    zone_names: &ZoneNames,
) -> Option<EntityDescriptor> {
    let (kind, icon) = match control.control_type() {
        ControlType::Temperature => (EntityKind::Climate, Some("mdi:fridge")),
        ControlType::AutoDoor => (EntityKind::Cover, Some(door_icon(DoorState::Unknown))),
        ControlType::Toggle => {
            let Some(spec) = ToggleSpec::lookup(control.name()) else {
                tracing::error!(
                    device_id = %device.id(),
                    control = %control.name(),
                    "Unknown toggle, not exposed"
                );
                return None;
            };
            (EntityKind::Switch, Some(spec.icon))
        }
        ControlType::HydroBreeze => {
            let mode = match control.value() {
                crate::control::ControlValue::HydroBreeze(mode) => *mode,
                _ => HydroBreezeMode::Off,
            };
            (EntityKind::Fan, Some(fan_icon(mode)))
        }
        ControlType::PresentationLight => match settings.light_exposure {
            LightExposure::Light => (EntityKind::Light, Some("mdi:lightbulb")),
            LightExposure::Number => (EntityKind::Number, Some("mdi:lightbulb")),
        },
        ControlType::IceMaker => (EntityKind::Select, Some("mdi:cube-outline")),
        ControlType::BioFreshPlus => {
            if control.bounds().supported_modes.is_empty() {
                tracing::error!(
                    device_id = %device.id(),
                    control = %control.name(),
                    "No supported modes, not exposed"
                );
                return None;
            }
            (EntityKind::Select, Some("mdi:leaf"))
        }
        ControlType::Other(_) => (EntityKind::Sensor, None),
    };

    let identity = control.identity(device.id());
    Some(EntityDescriptor {
        unique_id: identity.unique_id(),
        name: entity_name(device, control, zone_names),
        icon,
        kind,
        identity,
    })
}

fn entity_name(device: &Device, control: &Control, zone_names: &ZoneNames) -> String {
    let mut label = control.name().to_string();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    let mut name = format!("{} {label}", device.display_name());
    if let Some(position) = control.zone_position() {
        let zone = zone_names.get(position);
        if !zone.is_empty() {
            name.push(' ');
            name.push_str(zone);
        }
    }
    name
}
