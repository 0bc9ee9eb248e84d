// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliances known to the HomeAPI account.
//!
//! A [`Device`] is created from the appliance listing at setup and lives for
//! the whole run. Its controls are not stored here; they live in the
//! [`ControlRegistry`](crate::registry::ControlRegistry) and are replaced on
//! every poll.

mod device_id;

use std::fmt;

pub use device_id::DeviceId;

/// Broad appliance category reported by the HomeAPI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Single-zone refrigerator.
    Fridge,
    /// Single-zone freezer.
    Freezer,
    /// Combined fridge and freezer.
    Combi,
    /// Wine cabinet.
    Wine,
    /// A category this library does not know yet.
    Other(String),
}

impl DeviceType {
    /// Maps the HomeAPI `deviceType` string.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "FRIDGE" => Self::Fridge,
            "FREEZER" => Self::Freezer,
            "COMBI" => Self::Combi,
            "WINE" => Self::Wine,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Returns the HomeAPI string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fridge => "FRIDGE",
            Self::Freezer => "FREEZER",
            Self::Combi => "COMBI",
            Self::Wine => "WINE",
            Self::Other(s) => s,
        }
    }

    /// Returns `true` for appliances with more than one climate zone.
    #[must_use]
    pub fn is_multi_zone(&self) -> bool {
        matches!(self, Self::Combi)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appliance registered to the account.
///
/// # Examples
///
/// ```
/// use liebherr_lib::{Device, DeviceType};
///
/// let device = Device::new("942007")
///     .with_name("Kitchen")
///     .with_model("WPgbi 7472-20")
///     .with_device_type(DeviceType::Wine);
///
/// assert_eq!(device.display_name(), "Kitchen");
/// assert_eq!(device.model_name(), "WPgbi 7472-20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    id: DeviceId,
    name: Option<String>,
    model: Option<String>,
    device_type: DeviceType,
    image_url: Option<String>,
}

impl Device {
    /// Manufacturer reported for every appliance.
    pub const MANUFACTURER: &'static str = "Liebherr";

    /// Creates a device with only its identifier set.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            model: None,
            device_type: DeviceType::Other(String::new()),
            image_url: None,
        }
    }

    /// Sets the user-assigned nickname.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the model string.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the device category.
    #[must_use]
    pub fn with_device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    /// Sets the product image URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns the nickname, if the user assigned one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the model string, if reported.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the device category.
    #[must_use]
    pub fn device_type(&self) -> &DeviceType {
        &self.device_type
    }

    /// Returns the product image URL, if reported.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the nickname, or a generated name when none is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Liebherr HomeAPI Appliance {}", self.id),
        }
    }

    /// Returns the model, or `"Unknown Model"` when none is reported.
    #[must_use]
    pub fn model_name(&self) -> &str {
        match self.model.as_deref() {
            Some(model) if !model.is_empty() => model,
            _ => "Unknown Model",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_from_api() {
        assert_eq!(DeviceType::from_api("COMBI"), DeviceType::Combi);
        assert_eq!(DeviceType::from_api("fridge"), DeviceType::Fridge);
        assert_eq!(
            DeviceType::from_api("CELLAR"),
            DeviceType::Other("CELLAR".to_string())
        );
    }

    #[test]
    fn device_type_as_str_keeps_unknown() {
        assert_eq!(DeviceType::Other("CELLAR".to_string()).as_str(), "CELLAR");
        assert!(DeviceType::Combi.is_multi_zone());
        assert!(!DeviceType::Wine.is_multi_zone());
    }

    #[test]
    fn display_name_fallback() {
        let device = Device::new("942007");
        assert_eq!(device.display_name(), "Liebherr HomeAPI Appliance 942007");

        let device = Device::new("942007").with_name("");
        assert_eq!(device.display_name(), "Liebherr HomeAPI Appliance 942007");
    }

    #[test]
    fn model_name_fallback() {
        assert_eq!(Device::new("1").model_name(), "Unknown Model");
        assert_eq!(
            Device::new("1").with_model("CBNbsd 578i").model_name(),
            "CBNbsd 578i"
        );
    }
}
