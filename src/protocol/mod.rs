// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the Liebherr SmartDevice HomeAPI.
//!
//! The polling core only depends on the [`ApplianceApi`] trait. The crate
//! ships one implementation:
//!
//! - [`HttpClient`]: HTTPS client using the `api-key` header (feature `http`)
//!
//! Any other transport, or a test double, can implement the trait.

#[cfg(feature = "http")]
mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;

#[cfg(feature = "http")]
pub use http::{ApiConfig, HttpClient, HttpClientBuilder};

use crate::command::ControlRequest;
use crate::control::Control;
use crate::device::{Device, DeviceId};
use crate::error::Result;

/// Response to a control write.
#[derive(Debug, Clone, Default)]
pub struct CommandResponse {
    /// The raw response body (may be empty).
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> std::result::Result<T, crate::error::ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// The calls the polling core makes against the vendor API.
///
/// Failures are reported as [`Error`](crate::Error) values whose
/// [`kind`](crate::Error::kind) drives the scheduler: `Auth` halts,
/// `RateLimit` backs off to the next tick, `Fetch` is retried next tick.
pub trait ApplianceApi: Send + Sync + 'static {
    /// Lists the appliances registered to the account.
    ///
    /// # Errors
    ///
    /// Returns an error of kind `Auth` or `Fetch`.
    fn list_appliances(&self) -> impl Future<Output = Result<Vec<Device>>> + Send;

    /// Fetches the current controls of one appliance.
    ///
    /// # Errors
    ///
    /// Returns an error of kind `Auth`, `RateLimit` or `Fetch`.
    fn get_controls(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Vec<Control>>> + Send;

    /// Writes one control.
    ///
    /// # Errors
    ///
    /// Returns an error of kind `Auth`, `RateLimit` or `Fetch`.
    fn set_value(
        &self,
        device_id: &DeviceId,
        request: &ControlRequest,
    ) -> impl Future<Output = Result<CommandResponse>> + Send;
}
