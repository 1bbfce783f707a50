//! Error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching a collection from the backend.
///
/// Only the display string crosses the source boundary; see
/// [`Snapshot::error`](crate::source::Snapshot::error).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not reach the backend.
    #[error("Network Error: {0}")]
    Connection(String),

    /// No complete response within the configured timeout.
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// The backend answered with a non-success status.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// The response body was not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Any other HTTP client failure.
    #[error("HTTP request failed: {0}")]
    Http(String),
}

impl FetchError {
    /// Classify a client error. `timeout` is reported back in the message.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

/// Errors raised while loading or validating [`Settings`](crate::settings::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
