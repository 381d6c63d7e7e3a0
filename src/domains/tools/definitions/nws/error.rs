//! Upstream request error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the NWS API.
///
/// Every variant is treated the same way by the forecast tool (the upstream
/// is considered unreachable); the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum NwsError {
    /// The request did not complete within the configured deadline.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Network-level failure (DNS, connection refused, TLS, invalid URL).
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status code.
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: StatusCode },

    /// The response body was not the expected JSON document.
    #[error("Invalid response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl NwsError {
    /// Classify a reqwest send error, separating deadline expiry.
    pub fn from_send(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Classify a reqwest body/decode error, separating deadline expiry.
    pub fn from_decode(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Decode {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Create a status error.
    pub fn status(url: impl Into<String>, status: StatusCode) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }
}
