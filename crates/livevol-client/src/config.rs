//! Client configuration.
//!
//! Endpoint URLs, transport timeout, and token cache location live on
//! [`ClientConfig`] rather than in globals so tests can point the client at a
//! mock server and a temporary cache file.

use livevol_core::{Credentials, Endpoint, LiveVolError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Base URL for the LiveVol REST API.
pub const LIVEVOL_BASE_URL: &str = "https://api.livevol.com/v1/";

/// OAuth2 token endpoint.
pub const LIVEVOL_AUTH_URL: &str = "https://id.livevol.com/connect/token";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the OAuth2 client id.
pub const CLIENT_ID_VAR: &str = "LIVEVOL_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret.
pub const CLIENT_SECRET_VAR: &str = "LIVEVOL_CLIENT_SECRET";
/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_VAR: &str = "LIVEVOL_BASE_URL";
/// Environment variable overriding [`ClientConfig::auth_url`].
pub const AUTH_URL_VAR: &str = "LIVEVOL_AUTH_URL";
/// Environment variable overriding [`ClientConfig::timeout`], in seconds.
pub const TIMEOUT_VAR: &str = "LIVEVOL_TIMEOUT_SECS";
/// Environment variable overriding [`ClientConfig::token_cache_path`].
pub const TOKEN_CACHE_VAR: &str = "LIVEVOL_TOKEN_CACHE";

/// Settings for a [`LiveVolClient`](crate::LiveVolClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// OAuth2 token endpoint URL.
    pub auth_url: String,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    /// Location of the persisted token file.
    pub token_cache_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: LIVEVOL_BASE_URL.to_string(),
            auth_url: LIVEVOL_AUTH_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            token_cache_path: PathBuf::from(livevol_cache::DEFAULT_TOKEN_FILE),
        }
    }
}

impl ClientConfig {
    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the OAuth2 token endpoint URL.
    #[must_use]
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the token cache file location.
    #[must_use]
    pub fn with_token_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache_path = path.into();
        self
    }

    /// Build the full URL for a market-data endpoint.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.relative_path()
        )
    }

    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one exists. Every variable is optional and
    /// falls back to the default.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Configuration`] if `LIVEVOL_TIMEOUT_SECS` is not an integer.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Configuration`] if the timeout is not an integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(auth_url) = lookup(AUTH_URL_VAR) {
            config.auth_url = auth_url;
        }
        if let Some(path) = lookup(TOKEN_CACHE_VAR) {
            config.token_cache_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                LiveVolError::Configuration(format!("Invalid {TIMEOUT_VAR}: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Load OAuth2 credentials from `LIVEVOL_CLIENT_ID` and `LIVEVOL_CLIENT_SECRET`.
///
/// Reads a `.env` file first if one exists.
///
/// # Errors
/// Returns [`LiveVolError::Configuration`] if either variable is missing or empty.
pub fn credentials_from_env() -> Result<Credentials> {
    dotenvy::dotenv().ok();
    credentials_from_lookup(|key| std::env::var(key).ok())
}

/// Load OAuth2 credentials through an arbitrary variable lookup.
///
/// # Errors
/// Returns [`LiveVolError::Configuration`] if either variable is missing or empty.
pub fn credentials_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
    let require = |key: &str| {
        lookup(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| LiveVolError::Configuration(format!("{key} not set")))
    };

    Ok(Credentials::new(
        require(CLIENT_ID_VAR)?,
        require(CLIENT_SECRET_VAR)?,
    ))
}
