// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control listing response parsing.
//!
//! Parsing is lenient per entry: an entry of a known family whose value
//! cannot be understood is kept with a [`ControlValue::Raw`] payload, and an
//! entry of an unknown family is kept as [`ControlType::Other`]. Only entries
//! without a `type` discriminator are skipped.

use serde::Deserialize;

use crate::control::{Control, ControlBounds, ControlType, ControlValue};
use crate::error::ParseError;
use crate::types::{DoorPosition, HydroBreezeMode, IceMakerMode, ZonePosition};

/// One entry of the `GET /devices/{id}/controls` listing.
///
/// Family-specific fields are optional; which ones are present depends on
/// `type`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    /// Family discriminator, e.g. `TemperatureControl`.
    #[serde(rename = "type")]
    pub control_type: String,
    /// Control name.
    #[serde(default, alias = "controlName")]
    pub name: Option<String>,
    /// Zone identifier.
    #[serde(default)]
    pub zone_id: Option<u32>,
    /// Zone position (`top`, `middle`, `bottom`).
    #[serde(default)]
    pub zone_position: Option<String>,
    /// Primary value; shape depends on the family.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// Requested temperature or light level.
    #[serde(default)]
    pub target: Option<i32>,
    /// Lower bound.
    #[serde(default)]
    pub min: Option<i32>,
    /// Upper bound.
    #[serde(default)]
    pub max: Option<i32>,
    /// Unit of measurement.
    #[serde(default)]
    pub unit: Option<String>,
    /// Fan or BioFresh-Plus mode.
    #[serde(default)]
    pub current_mode: Option<String>,
    /// Ice maker mode.
    #[serde(default)]
    pub ice_maker_mode: Option<String>,
    /// Ice maker supports `MAX_ICE`.
    #[serde(default)]
    pub has_max_ice: Option<bool>,
    /// Modes a BioFresh-Plus compartment offers.
    #[serde(default)]
    pub supported_modes: Option<Vec<String>>,
}

impl ControlResponse {
    /// Converts the wire entry into a [`Control`].
    ///
    /// `raw` is the original JSON object; it becomes the payload when the
    /// family is unknown or its value is unusable.
    #[must_use]
    pub fn into_control(self, raw: &serde_json::Value) -> Control {
        let control_type = ControlType::from_api(&self.control_type);
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| control_type.default_name());
        let zone_position = self
            .zone_position
            .as_deref()
            .and_then(|p| p.parse::<ZonePosition>().ok());
        let zone_id = self.zone_id.unwrap_or(0);

        let (value, bounds) = self.family_value(&control_type);
        let value = value.unwrap_or_else(|| {
            tracing::debug!(control = %name, kind = %control_type, "Keeping raw control payload");
            ControlValue::Raw(raw.clone())
        });

        Control::new(control_type, name, value)
            .with_zone(zone_id, zone_position)
            .with_bounds(bounds)
    }

    fn family_value(&self, control_type: &ControlType) -> (Option<ControlValue>, ControlBounds) {
        let mut bounds = ControlBounds {
            min: self.min,
            max: self.max,
            unit: self.unit.clone(),
            ..ControlBounds::default()
        };

        let value = match control_type {
            ControlType::Temperature => {
                let current = self
                    .value
                    .as_ref()
                    .and_then(serde_json::Value::as_i64)
                    .and_then(|v| i32::try_from(v).ok());
                (current.is_some() || self.target.is_some()).then_some(ControlValue::Temperature {
                    current,
                    target: self.target,
                })
            }
            ControlType::AutoDoor => self
                .value_str()
                .and_then(|v| v.parse::<DoorPosition>().ok())
                .map(ControlValue::Door),
            ControlType::Toggle => self
                .value
                .as_ref()
                .and_then(serde_json::Value::as_bool)
                .map(ControlValue::Toggle),
            ControlType::HydroBreeze => {
                bounds.supported_modes = HydroBreezeMode::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect();
                self.current_mode
                    .as_deref()
                    .and_then(|m| m.parse::<HydroBreezeMode>().ok())
                    .map(ControlValue::HydroBreeze)
            }
            ControlType::PresentationLight => self
                .target
                .and_then(|t| u8::try_from(t).ok())
                .map(ControlValue::PresentationLight),
            ControlType::IceMaker => {
                bounds.has_max_ice = self.has_max_ice.unwrap_or(false);
                bounds.supported_modes = IceMakerMode::options(bounds.has_max_ice)
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect();
                self.ice_maker_mode
                    .as_deref()
                    .and_then(|m| m.parse::<IceMakerMode>().ok())
                    .map(ControlValue::IceMaker)
            }
            ControlType::BioFreshPlus => {
                bounds.supported_modes = self
                    .supported_modes
                    .iter()
                    .flatten()
                    .map(|m| m.to_uppercase())
                    .collect();
                self.current_mode
                    .as_deref()
                    .map(|m| ControlValue::BioFreshPlus(m.to_uppercase()))
            }
            ControlType::Other(_) => None,
        };

        (value, bounds)
    }

    fn value_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(serde_json::Value::as_str)
    }
}

/// Parses the body of `GET /devices/{id}/controls`.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if the body is not a JSON array.
pub fn parse_controls(body: &str) -> Result<Vec<Control>, ParseError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let mut controls = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(kind) = entry.get("type").and_then(serde_json::Value::as_str) else {
            tracing::warn!(entry = %entry, "Skipping control without type");
            continue;
        };

        match serde_json::from_value::<ControlResponse>(entry.clone()) {
            Ok(response) => controls.push(response.into_control(&entry)),
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Control fields malformed, keeping raw payload");
                let control_type = ControlType::from_api(kind);
                let name = entry
                    .get("name")
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| control_type.default_name(), str::to_string);
                controls.push(Control::new(control_type, name, ControlValue::Raw(entry)));
            }
        }
    }

    Ok(controls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(json: &str) -> Control {
        let mut controls = parse_controls(&format!("[{json}]")).unwrap();
        assert_eq!(controls.len(), 1);
        controls.remove(0)
    }

    #[test]
    fn temperature_control() {
        let control = single(
            r#"{"type": "TemperatureControl", "name": "fridge", "zoneId": 0, "zonePosition": "top",
                "value": 5, "target": 4, "min": 2, "max": 9, "unit": "°C"}"#,
        );
        assert_eq!(control.control_type(), &ControlType::Temperature);
        assert_eq!(control.zone_position(), Some(ZonePosition::Top));
        assert_eq!(
            control.value(),
            &ControlValue::Temperature {
                current: Some(5),
                target: Some(4)
            }
        );
        assert_eq!(control.bounds().min, Some(2));
        assert_eq!(control.bounds().max, Some(9));
        assert_eq!(control.bounds().unit.as_deref(), Some("°C"));
    }

    #[test]
    fn door_control() {
        let control = single(r#"{"type": "AutoDoorControl", "name": "autodoor", "zoneId": 1, "value": "MOVING"}"#);
        assert_eq!(control.value(), &ControlValue::Door(DoorPosition::Moving));
        assert_eq!(control.zone_id(), 1);
    }

    #[test]
    fn toggle_control() {
        let control = single(r#"{"type": "ToggleControl", "name": "supercool", "zoneId": 0, "value": true}"#);
        assert_eq!(control.value(), &ControlValue::Toggle(true));
    }

    #[test]
    fn hydro_breeze_control() {
        let control = single(r#"{"type": "HydroBreezeControl", "zoneId": 0, "currentMode": "MEDIUM"}"#);
        assert_eq!(control.name(), "hydrobreeze");
        assert_eq!(
            control.value(),
            &ControlValue::HydroBreeze(HydroBreezeMode::Medium)
        );
        assert_eq!(control.bounds().supported_modes.len(), 4);
    }

    #[test]
    fn presentation_light_control() {
        let control = single(r#"{"type": "PresentationLightControl", "name": "presentationlight", "target": 3, "max": 5}"#);
        assert_eq!(control.value(), &ControlValue::PresentationLight(3));
        assert_eq!(control.bounds().max, Some(5));
    }

    #[test]
    fn ice_maker_control() {
        let control = single(
            r#"{"type": "IceMakerControl", "name": "icemaker", "zoneId": 2, "iceMakerMode": "MAX_ICE", "hasMaxIce": true}"#,
        );
        assert_eq!(control.value(), &ControlValue::IceMaker(IceMakerMode::MaxIce));
        assert!(control.bounds().has_max_ice);
        assert_eq!(control.bounds().supported_modes, vec!["ON", "OFF", "MAX_ICE"]);
    }

    #[test]
    fn bio_fresh_plus_modes_are_uppercased() {
        let control = single(
            r#"{"type": "BioFreshPlusControl", "name": "biofreshplus", "currentMode": "zero_zero",
                "supportedModes": ["zero_zero", "minus_two_zero"]}"#,
        );
        assert_eq!(
            control.value(),
            &ControlValue::BioFreshPlus("ZERO_ZERO".to_string())
        );
        assert_eq!(
            control.bounds().supported_modes,
            vec!["ZERO_ZERO", "MINUS_TWO_ZERO"]
        );
    }

    #[test]
    fn unknown_family_is_stored_raw() {
        let control = single(r#"{"type": "WaterFilterControl", "name": "waterfilter", "value": 80}"#);
        assert_eq!(
            control.control_type(),
            &ControlType::Other("WaterFilterControl".to_string())
        );
        assert!(matches!(control.value(), ControlValue::Raw(v) if v["value"] == 80));
    }

    #[test]
    fn unparseable_value_falls_back_to_raw() {
        let control = single(r#"{"type": "AutoDoorControl", "name": "autodoor", "value": "AJAR"}"#);
        assert_eq!(control.control_type(), &ControlType::AutoDoor);
        assert!(matches!(control.value(), ControlValue::Raw(_)));
    }

    #[test]
    fn malformed_fields_keep_entry() {
        let control = single(r#"{"type": "TemperatureControl", "name": "fridge", "zoneId": "zero"}"#);
        assert_eq!(control.name(), "fridge");
        assert!(matches!(control.value(), ControlValue::Raw(_)));
    }

    #[test]
    fn entry_without_type_is_skipped() {
        let controls =
            parse_controls(r#"[{"name": "mystery"}, {"type": "ToggleControl", "name": "nightmode", "value": false}]"#)
                .unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].name(), "nightmode");
    }

    #[test]
    fn non_array_body_is_an_error() {
        assert!(parse_controls(r#"{"error": "nope"}"#).is_err());
    }
}
