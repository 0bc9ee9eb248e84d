// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;

/// Identifier of an appliance as assigned by the HomeAPI.
///
/// The value is opaque and stable across sessions. Wrapping it prevents
/// accidental confusion with control names or other strings.
///
/// # Examples
///
/// ```
/// use liebherr_lib::DeviceId;
///
/// let id = DeviceId::new("123456789");
/// assert_eq!(id.as_str(), "123456789");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device identifier from the HomeAPI value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality() {
        assert_eq!(DeviceId::new("abc"), DeviceId::from("abc"));
        assert_ne!(DeviceId::new("abc"), DeviceId::new("abd"));
    }

    #[test]
    fn debug_format() {
        let id = DeviceId::new("942007");
        assert_eq!(format!("{id:?}"), "DeviceId(942007)");
    }

    #[test]
    fn serde_is_transparent() {
        let id: DeviceId = serde_json::from_str("\"942007\"").unwrap();
        assert_eq!(id.as_str(), "942007");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"942007\"");
    }
}
