// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `liebherr_lib` library.
//!
//! Failures fall into four kinds (see [`ErrorKind`]):
//!
//! - **Auth**: the API key is invalid or expired. Fatal; never retried.
//! - **`RateLimit`**: the HomeAPI throttled us. Retried on the next scheduled tick.
//! - **Fetch**: any other network, status or parse failure. Retried on the next tick.
//! - **Validation**: a command was rejected locally before reaching the network.

use thiserror::Error;

use crate::control::ControlIdentity;
use crate::device::DeviceId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested value failed local validation.
    #[error("validation error: {0}")]
    Value(#[from] ValueError),

    /// The HomeAPI call failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The HomeAPI answered with a body we could not understand.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device is not tracked by this instance.
    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    /// The control is not present in the current snapshot.
    #[error("control not found: {0}")]
    ControlNotFound(ControlIdentity),

    /// The scheduler stopped after a fatal failure and no longer polls.
    #[error("scheduler for {0} is halted")]
    SchedulerHalted(DeviceId),
}

impl Error {
    /// Classifies this error into the failure taxonomy that drives
    /// scheduler transitions.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Value(_) => ErrorKind::Validation,
            Self::Api(ApiError::Authentication) | Self::SchedulerHalted(_) => ErrorKind::Auth,
            Self::Api(ApiError::RateLimited) => ErrorKind::RateLimit,
            Self::Api(_) | Self::Parse(_) | Self::DeviceNotFound(_) | Self::ControlNotFound(_) => {
                ErrorKind::Fetch
            }
        }
    }

    /// Returns `true` for a fatal credential failure.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Returns `true` if the failure is recovered by waiting for the next tick.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::RateLimit | ErrorKind::Fetch)
    }
}

/// Failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Credential invalid or expired.
    Auth,
    /// Remote throttling.
    RateLimit,
    /// Generic network or parse failure.
    Fetch,
    /// Local, pre-network rejection of a command.
    Validation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Fetch => "fetch",
            Self::Validation => "validation",
        };
        f.write_str(s)
    }
}

/// Errors related to value validation and constraints.
///
/// These are produced before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// The option is not in the control's declared option set.
    #[error("invalid option {option:?}, expected one of {allowed:?}")]
    InvalidOption {
        /// The rejected option.
        option: String,
        /// The options the control accepts.
        allowed: Vec<String>,
    },

    /// The command does not apply to this control family.
    #[error("{command} is not supported by {control}")]
    UnsupportedCommand {
        /// Name of the command.
        command: &'static str,
        /// Name of the control family.
        control: String,
    },

    /// The control cannot be written at all.
    #[error("control {0} is read-only")]
    ReadOnly(String),

    /// A mode string could not be parsed.
    #[error("invalid {kind} mode: {value}")]
    InvalidMode {
        /// The mode family.
        kind: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Errors returned by the HomeAPI transport.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key was rejected.
    #[error("authentication failed")]
    Authentication,

    /// The HomeAPI rate limit was exceeded.
    #[error("API rate limit exceeded")]
    RateLimited,

    /// The HomeAPI answered with an unexpected status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase or response body excerpt.
        message: String,
    },

    /// Invalid base URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing HomeAPI responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
