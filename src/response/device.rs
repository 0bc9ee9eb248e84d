// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance listing response parsing.

use serde::Deserialize;

use crate::device::{Device, DeviceType};
use crate::error::ParseError;

/// One entry of the `GET /devices` listing.
///
/// # Examples
///
/// ```
/// use liebherr_lib::response::DeviceResponse;
///
/// let json = r#"{"deviceId": "942007", "nickname": "Kitchen", "deviceName": "CBNbsd 578i", "deviceType": "COMBI"}"#;
/// let response: DeviceResponse = serde_json::from_str(json).unwrap();
/// let device = response.into_device();
/// assert_eq!(device.display_name(), "Kitchen");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    /// Appliance identifier.
    pub device_id: String,
    /// User-assigned name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Model designation.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Appliance category.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Product image.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl DeviceResponse {
    /// Converts the wire entry into a [`Device`].
    #[must_use]
    pub fn into_device(self) -> Device {
        let mut device = Device::new(self.device_id);
        if let Some(name) = self.nickname {
            device = device.with_name(name);
        }
        if let Some(model) = self.device_name {
            device = device.with_model(model);
        }
        if let Some(device_type) = self.device_type {
            device = device.with_device_type(DeviceType::from_api(&device_type));
        }
        if let Some(url) = self.image_url {
            device = device.with_image_url(url);
        }
        device
    }
}

/// Parses the body of `GET /devices`.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if the body is not an array of device objects.
pub fn parse_devices(body: &str) -> Result<Vec<Device>, ParseError> {
    let entries: Vec<DeviceResponse> = serde_json::from_str(body)?;
    Ok(entries.into_iter().map(DeviceResponse::into_device).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_listing() {
        let body = r#"[
            {"deviceId": "1", "nickname": "Kitchen", "deviceName": "WPgbi 7472-20", "deviceType": "WINE", "imageUrl": "https://example.com/1.png"},
            {"deviceId": "2"}
        ]"#;
        let devices = parse_devices(body).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].model(), Some("WPgbi 7472-20"));
        assert_eq!(devices[0].device_type(), &DeviceType::Wine);
        assert_eq!(devices[0].image_url(), Some("https://example.com/1.png"));
        assert_eq!(devices[1].display_name(), "Liebherr HomeAPI Appliance 2");
    }

    #[test]
    fn missing_id_is_an_error() {
        assert!(parse_devices(r#"[{"nickname": "x"}]"#).is_err());
    }

    #[test]
    fn empty_listing() {
        assert!(parse_devices("[]").unwrap().is_empty());
    }
}
