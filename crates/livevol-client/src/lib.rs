#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/livevol/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! LiveVol market-data API client.
//!
//! This crate implements the livevol-core traits for the
//! [LiveVol](https://api.livevol.com/) REST API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use livevol_client::LiveVolClient;
//! use livevol_core::{MarketDataProvider, QueryParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LiveVolClient::new("client_id", "client_secret");
//!     client.authorize().await?;
//!
//!     let params = QueryParams::new().symbol("SPY").root("SPY");
//!     let breakdown = client.option_trades_breakdown(&params).await?;
//!     println!("points used: {:?}", breakdown.points_used);
//!
//!     Ok(())
//! }
//! ```

/// Bearer token acquisition and caching.
pub mod auth;
/// Client configuration.
pub mod config;

pub use auth::TokenStore;
pub use config::{ClientConfig, credentials_from_env, credentials_from_lookup};

use async_trait::async_trait;
use livevol_cache::FileTokenCache;
use livevol_core::{
    Credentials, Endpoint, LiveVolError, MarketDataProvider, QueryParams, QueryResponse, Result,
    TokenCache,
};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Response header reporting monthly API usage.
pub const POINTS_USED_HEADER: &str = "x-monthly-points-used";

/// LiveVol market-data client.
///
/// Every query first makes sure a valid bearer token is held (see
/// [`TokenStore`]), then issues a single GET. Requests are never retried.
#[derive(Debug)]
pub struct LiveVolClient {
    client: Client,
    config: ClientConfig,
    tokens: TokenStore,
}

impl LiveVolClient {
    /// Create a client with default endpoints and the token cached in `cboe_auth.json`.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::with_client(
            Client::new(),
            Credentials::new(client_id, client_secret),
            ClientConfig::default(),
        )
    }

    /// Create a client from a configuration, building an HTTP client with its timeout.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Network`] if the HTTP client cannot be built.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LiveVolError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, credentials, config))
    }

    /// Create a client with a custom HTTP client.
    ///
    /// The token is cached in the file named by [`ClientConfig::token_cache_path`].
    #[must_use]
    pub fn with_client(client: Client, credentials: Credentials, config: ClientConfig) -> Self {
        let cache = Arc::new(FileTokenCache::new(config.token_cache_path.clone()));
        let tokens = TokenStore::new(client.clone(), config.auth_url.clone(), credentials, cache);
        Self {
            client,
            config,
            tokens,
        }
    }

    /// Create a client from `LIVEVOL_*` environment variables.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Configuration`] if credentials are missing or a value is malformed.
    pub fn from_env() -> Result<Self> {
        let credentials = credentials_from_env()?;
        let config = ClientConfig::from_env()?;
        Self::with_config(credentials, config)
    }

    /// Replace the token cache. Any held token is dropped.
    #[must_use]
    pub fn with_token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.tokens = TokenStore::new(
            self.client.clone(),
            self.config.auth_url.clone(),
            self.tokens.credentials().clone(),
            cache,
        );
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the token store.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Load a cached token or request a new one.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Authentication`] if no token could be obtained.
    pub async fn authorize(&self) -> Result<()> {
        self.tokens.authorize().await.map(drop)
    }

    /// Authorize only if no valid token is held.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Authentication`] if no token could be obtained.
    pub async fn ensure_valid_token(&self) -> Result<()> {
        self.tokens.ensure_valid_token().await.map(drop)
    }

    /// Returns true if a token is held and has not expired.
    pub async fn is_token_valid(&self) -> bool {
        self.tokens.is_token_valid().await
    }

    /// Handle a non-200 query response sent with `access_token`.
    async fn query_failed(
        &self,
        endpoint: Endpoint,
        status: StatusCode,
        headers: &HeaderMap,
        access_token: &str,
    ) -> LiveVolError {
        warn!(
            status = status.as_u16(),
            ?headers,
            "Could not get {}",
            endpoint.label()
        );

        match status {
            StatusCode::TOO_MANY_REQUESTS => LiveVolError::RateLimited {
                endpoint,
                retry_after: retry_after(headers),
            },
            StatusCode::UNAUTHORIZED => {
                if let Err(e) = self.tokens.invalidate_if(access_token).await {
                    warn!(error = %e, "Failed to invalidate rejected token");
                }
                LiveVolError::Http {
                    endpoint,
                    status: status.as_u16(),
                }
            }
            _ => LiveVolError::Http {
                endpoint,
                status: status.as_u16(),
            },
        }
    }
}

#[async_trait]
impl MarketDataProvider for LiveVolClient {
    fn name(&self) -> &str {
        "LiveVol"
    }

    #[instrument(
        skip(self, params),
        fields(endpoint = %endpoint, symbol = params.symbol_or_default())
    )]
    async fn query(&self, endpoint: Endpoint, params: &QueryParams) -> Result<QueryResponse> {
        if params.is_empty() {
            return Err(LiveVolError::InvalidParameter(format!(
                "{endpoint} requires at least one query parameter"
            )));
        }

        let access_token = self.tokens.ensure_valid_token().await?;
        let url = self.config.endpoint_url(endpoint);
        debug!("LiveVol request: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&access_token)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "{} request failed", endpoint.label());
                LiveVolError::Network(e.to_string())
            })?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            "{} request completed",
            endpoint.label()
        );

        if status != StatusCode::OK {
            let headers = response.headers();
            return Err(self
                .query_failed(endpoint, status, headers, &access_token)
                .await);
        }

        let points_used = points_used(response.headers());
        match points_used {
            Some(points) => info!(points_used = points, "Monthly points used"),
            None => debug!("No {} header in response", POINTS_USED_HEADER),
        }

        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| LiveVolError::Network(e.to_string()))?;

        let data: Value = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, ?headers, "Could not decode {}", endpoint.label());
            let preview: String = text.chars().take(200).collect();
            LiveVolError::Parse(format!("{e}: {preview}"))
        })?;

        Ok(QueryResponse::new(endpoint, data, points_used))
    }
}

/// Parse the monthly usage header, if present and numeric.
fn points_used(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(POINTS_USED_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Parse a `Retry-After` header given in seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}
