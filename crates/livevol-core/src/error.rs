//! Error types for LiveVol client operations.
//!
//! This module defines [`LiveVolError`] which covers every failure that can occur
//! while authorizing, querying, caching tokens, or writing results to disk.

use std::time::Duration;

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Errors that can occur during LiveVol operations.
#[derive(Error, Debug)]
pub enum LiveVolError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The token request was rejected or its response was unusable.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A query endpoint answered with a non-200 status.
    #[error("{endpoint} request failed with HTTP {status}")]
    Http {
        /// The endpoint that was queried.
        endpoint: Endpoint,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Rate limit exceeded on a query endpoint.
    #[error("Rate limited on {endpoint}: retry after {retry_after:?}")]
    RateLimited {
        /// The endpoint that was queried.
        endpoint: Endpoint,
        /// Suggested time to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// A response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the token cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem error outside the token cache.
    #[error("I/O error: {0}")]
    Io(String),
}

impl LiveVolError {
    /// Returns true if no usable token could be obtained.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns true if a query request failed after a token was obtained.
    #[must_use]
    pub const fn is_query_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http { .. } | Self::RateLimited { .. } | Self::Parse(_)
        )
    }
}

/// Result type alias using [`LiveVolError`].
pub type Result<T> = std::result::Result<T, LiveVolError>;
