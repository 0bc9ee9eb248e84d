// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Write requests in HomeAPI wire form.

use std::time::Duration;

use serde_json::json;

use crate::types::{HydroBreezeMode, IceMakerMode};

/// Delay after a write before the next poll is trusted.
///
/// The HomeAPI can echo the pre-write value for a few seconds after
/// temperature and mode changes.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// A control write, one variant per family.
///
/// Each request knows its endpoint (`POST /devices/{id}/controls/{endpoint}`)
/// and its JSON body.
///
/// # Examples
///
/// ```
/// use liebherr_lib::command::ControlRequest;
///
/// let request = ControlRequest::Temperature { zone_id: 0, target: 4, unit: "°C".into() };
/// assert_eq!(request.endpoint(), "temperature");
/// assert_eq!(request.body()["target"], 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Set a zone's target temperature.
    Temperature {
        /// Zone identifier.
        zone_id: u32,
        /// Target temperature.
        target: i32,
        /// Unit the target is expressed in.
        unit: String,
    },
    /// Open or close a motorised door.
    AutoDoor {
        /// Zone identifier.
        zone_id: u32,
        /// `true` opens, `false` closes.
        open: bool,
    },
    /// Switch a named toggle.
    Toggle {
        /// Toggle name, used as the endpoint.
        name: String,
        /// Present for zone-scoped toggles.
        zone_id: Option<u32>,
        /// New state.
        value: bool,
    },
    /// Change the HydroBreeze mode.
    HydroBreeze {
        /// Zone identifier.
        zone_id: u32,
        /// New mode.
        mode: HydroBreezeMode,
    },
    /// Set the presentation light level.
    PresentationLight {
        /// Discrete level; 0 switches the light off.
        target: u8,
    },
    /// Change the ice maker mode.
    IceMaker {
        /// Zone identifier.
        zone_id: u32,
        /// New mode.
        mode: IceMakerMode,
    },
    /// Change the BioFresh-Plus mode.
    BioFreshPlus {
        /// Zone identifier.
        zone_id: u32,
        /// New mode, upper-cased.
        mode: String,
    },
}

impl ControlRequest {
    /// Returns the endpoint segment under `/controls/`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        match self {
            Self::Temperature { .. } => "temperature".to_string(),
            Self::AutoDoor { .. } => "autodoor".to_string(),
            Self::Toggle { name, .. } => name.to_lowercase(),
            Self::HydroBreeze { .. } => "hydrobreeze".to_string(),
            Self::PresentationLight { .. } => "presentationlight".to_string(),
            Self::IceMaker { .. } => "icemaker".to_string(),
            Self::BioFreshPlus { .. } => "biofreshplus".to_string(),
        }
    }

    /// Returns the JSON request body.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::Temperature {
                zone_id,
                target,
                unit,
            } => json!({ "zoneId": zone_id, "target": target, "unit": unit }),
            Self::AutoDoor { zone_id, open } => json!({ "zoneId": zone_id, "value": open }),
            Self::Toggle {
                zone_id: Some(zone_id),
                value,
                ..
            } => json!({ "zoneId": zone_id, "value": value }),
            Self::Toggle {
                zone_id: None,
                value,
                ..
            } => json!({ "value": value }),
            Self::HydroBreeze { zone_id, mode } => {
                json!({ "zoneId": zone_id, "hydroBreezeMode": mode.as_str() })
            }
            Self::PresentationLight { target } => json!({ "target": target }),
            Self::IceMaker { zone_id, mode } => {
                json!({ "zoneId": zone_id, "iceMakerMode": mode.as_str() })
            }
            Self::BioFreshPlus { zone_id, mode } => {
                json!({ "zoneId": zone_id, "bioFreshPlusMode": mode })
            }
        }
    }

    /// Returns how long to wait before trusting the next poll, if at all.
    #[must_use]
    pub fn settle_delay(&self) -> Option<Duration> {
        match self {
            Self::Temperature { .. } | Self::IceMaker { .. } | Self::BioFreshPlus { .. } => {
                Some(SETTLE_DELAY)
            }
            _ => None,
        }
    }
}
