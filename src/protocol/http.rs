// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTPS implementation of the HomeAPI client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};

use crate::command::ControlRequest;
use crate::control::Control;
use crate::device::{Device, DeviceId};
use crate::error::{ApiError, Result};
use crate::protocol::{ApplianceApi, CommandResponse};
use crate::response::{parse_controls, parse_devices};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "api-key";

// ============================================================================
// ApiConfig - Connection parameters
// ============================================================================

/// Configuration for the HomeAPI client.
///
/// # Examples
///
/// ```
/// use liebherr_lib::protocol::ApiConfig;
/// use std::time::Duration;
///
/// let config = ApiConfig::new("my-api-key")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), ApiConfig::DEFAULT_BASE_URL);
/// ```
#[derive(Clone)]
pub struct ApiConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Production endpoint for the device collection.
    pub const DEFAULT_BASE_URL: &'static str =
        "https://home-api.smartdevice.liebherr.com/v1/devices";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the production endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Points the client at another device collection URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the device collection URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty or the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> std::result::Result<HttpClient, ApiError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url,
            api_key: self.api_key,
            client,
        })
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// HttpClient - HomeAPI over HTTPS
// ============================================================================

/// HTTP client for the Liebherr SmartDevice HomeAPI.
///
/// Endpoints, relative to the device collection URL:
///
/// - `GET /` lists appliances
/// - `GET /{deviceId}/controls` fetches controls
/// - `POST /{deviceId}/controls/{endpoint}` writes one control
///
/// # Examples
///
/// ```no_run
/// use liebherr_lib::protocol::{ApplianceApi, HttpClient};
///
/// # async fn example() -> liebherr_lib::Result<()> {
/// let client = HttpClient::new("my-api-key")?;
/// for device in client.list_appliances().await? {
///     println!("{}", device.display_name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpClient {
    /// Creates a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> std::result::Result<Self, ApiError> {
        ApiConfig::new(api_key).into_client()
    }

    /// Returns the device collection URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn controls_url(&self, device_id: &DeviceId) -> String {
        format!(
            "{}/{}/controls",
            self.base_url,
            urlencoding::encode(device_id.as_str())
        )
    }

    fn control_url(&self, device_id: &DeviceId, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.controls_url(device_id),
            urlencoding::encode(endpoint)
        )
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<String, ApiError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(ApiError::Http)?;

        check_status(response.status())?;

        let body = response.text().await.map_err(ApiError::Http)?;

        tracing::trace!(body = %body, "Received HTTP response");

        Ok(body)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Maps an HTTP status to the failure taxonomy.
fn check_status(status: StatusCode) -> std::result::Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Authentication),
        StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
        _ => Err(ApiError::Status {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }),
    }
}

impl ApplianceApi for HttpClient {
    async fn list_appliances(&self) -> Result<Vec<Device>> {
        tracing::debug!(url = %self.base_url, "Listing appliances");

        let body = self.send(self.client.get(&self.base_url)).await?;
        Ok(parse_devices(&body)?)
    }

    async fn get_controls(&self, device_id: &DeviceId) -> Result<Vec<Control>> {
        let url = self.controls_url(device_id);

        tracing::debug!(url = %url, "Fetching controls");

        let body = self.send(self.client.get(&url)).await?;
        Ok(parse_controls(&body)?)
    }

    async fn set_value(&self, device_id: &DeviceId, request: &ControlRequest) -> Result<CommandResponse> {
        let url = self.control_url(device_id, &request.endpoint());
        let payload = request.body();

        tracing::debug!(url = %url, body = %payload, "Sending control request");

        let body = self.send(self.client.post(&url).json(&payload)).await?;
        Ok(CommandResponse::new(body))
    }
}

/// Builder for creating an HTTP client with custom configuration.
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClientBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the device collection URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] if no API key is set, or an
    /// error if client creation fails.
    pub fn build(self) -> std::result::Result<HttpClient, ApiError> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(ApiError::Authentication)?;

        let mut config = ApiConfig::new(api_key);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config.into_client()
    }
}
