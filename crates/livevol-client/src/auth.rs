//! Bearer token acquisition and caching.

use chrono::Utc;
use livevol_core::{Credentials, LiveVolError, Result, Token, TokenCache};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Holds the client's bearer token and refreshes it on demand.
///
/// At most one token is held at a time. Tokens come from the [`TokenCache`]
/// when a non-expired one is stored there, otherwise from a client-credentials
/// request to the authorization endpoint. The held token sits behind a mutex
/// that stays locked for the whole check-or-refresh sequence, so concurrent
/// callers on a shared client never authenticate twice.
#[derive(Debug)]
pub struct TokenStore {
    client: Client,
    auth_url: String,
    credentials: Credentials,
    cache: Arc<dyn TokenCache>,
    token: Mutex<Option<Token>>,
}

impl TokenStore {
    /// Create a token store with no token held.
    #[must_use]
    pub fn new(
        client: Client,
        auth_url: impl Into<String>,
        credentials: Credentials,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        Self {
            client,
            auth_url: auth_url.into(),
            credentials,
            cache,
            token: Mutex::new(None),
        }
    }

    /// Returns the credentials used for authorization.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns true if a token is held and expires in the future.
    pub async fn is_token_valid(&self) -> bool {
        self.token
            .lock()
            .await
            .as_ref()
            .is_some_and(|token| token.is_valid_at(Utc::now()))
    }

    /// Returns the held access token, authorizing first if it is missing or expired.
    ///
    /// A valid held token is returned without touching the cache or the network.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Authentication`] if a new token could not be obtained.
    pub async fn ensure_valid_token(&self) -> Result<String> {
        let mut held = self.token.lock().await;
        if let Some(token) = held.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
            return Ok(token.access_token.clone());
        }
        self.authorize_locked(&mut held).await
    }

    /// Loads a token from the cache, or requests a new one.
    ///
    /// A cached token is adopted if it is still valid. An expired cache entry
    /// is removed before a new token is requested; a newly issued token is
    /// written back to the cache. A token that is already expired is never
    /// returned, whichever source it came from.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Authentication`] if no token could be obtained. The
    /// store then holds no token and nothing is written to the cache.
    pub async fn authorize(&self) -> Result<String> {
        let mut held = self.token.lock().await;
        self.authorize_locked(&mut held).await
    }

    /// Drops the held token and clears the cache so the next call re-authenticates.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Cache`] if the cache entry could not be removed.
    pub async fn invalidate(&self) -> Result<()> {
        *self.token.lock().await = None;
        self.cache.clear().await
    }

    /// Like [`invalidate`](Self::invalidate), but only if `rejected` is still the held token.
    ///
    /// Returns `false` and keeps the current token when it has already been
    /// replaced, so a stale rejection never discards a fresh token.
    ///
    /// # Errors
    /// Returns [`LiveVolError::Cache`] if the cache entry could not be removed.
    pub async fn invalidate_if(&self, rejected: &str) -> Result<bool> {
        let mut held = self.token.lock().await;
        if held.as_ref().is_some_and(|token| token.access_token != rejected) {
            debug!("Rejected token already replaced, keeping current token");
            return Ok(false);
        }
        *held = None;
        self.cache.clear().await?;
        Ok(true)
    }

    async fn authorize_locked(&self, held: &mut Option<Token>) -> Result<String> {
        *held = None;

        match self.cache.load().await {
            Ok(Some(token)) if token.is_valid_at(Utc::now()) => {
                debug!(expiration_time = token.expiration_time, "Using cached token");
                let access_token = token.access_token.clone();
                *held = Some(token);
                return Ok(access_token);
            }
            Ok(Some(_)) => {
                debug!("Cached token expired, removing");
                if let Err(e) = self.cache.clear().await {
                    warn!(error = %e, "Failed to remove expired token");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Token cache unavailable, requesting new token"),
        }

        let token = self.request_token().await?;
        if !token.is_valid_at(Utc::now()) {
            warn!(
                expiration_time = token.expiration_time,
                "Auth server issued an expired token"
            );
            return Err(LiveVolError::Authentication(
                "token endpoint issued an expired token".to_string(),
            ));
        }
        if let Err(e) = self.cache.store(&token).await {
            warn!(error = %e, "Failed to persist token");
        }

        let access_token = token.access_token.clone();
        *held = Some(token);
        Ok(access_token)
    }

    /// Send the client-credentials request to the authorization endpoint.
    #[instrument(skip(self), fields(url = %self.auth_url))]
    async fn request_token(&self) -> Result<Token> {
        debug!("Requesting access token");

        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(
                self.credentials.client_id(),
                Some(self.credentials.client_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Token request failed");
                LiveVolError::Authentication(format!("token request failed: {e}"))
            })?;

        let status = response.status();
        info!(status = status.as_u16(), "Auth request completed");

        let headers = response.headers().clone();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), ?headers, "Could not get auth token");
            return Err(LiveVolError::Authentication(format!(
                "token endpoint returned HTTP {status}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!(error = %e, ?headers, "Could not decode auth response");
            LiveVolError::Authentication(format!("token response is not valid JSON: {e}"))
        })?;

        Token::from_auth_response(body, Utc::now()).inspect_err(|e| {
            warn!(error = %e, ?headers, "Could not get auth token");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use livevol_cache::FileTokenCache;
    use livevol_core::unix_seconds;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN_PATH: &str = "/connect/token";

    /// Base64 of `client:secret`.
    const BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

    fn cache_path(dir: &TempDir) -> PathBuf {
        dir.path().join("cboe_auth.json")
    }

    fn store_for(server: &MockServer, file: &Path) -> TokenStore {
        TokenStore::new(
            Client::new(),
            format!("{}{TOKEN_PATH}", server.uri()),
            Credentials::new("client", "secret"),
            Arc::new(FileTokenCache::new(file)),
        )
    }

    async fn mount_token_response(server: &MockServer, body: Value, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(header("authorization", BASIC_AUTH))
            .and(body_string("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn read_cache(file: &Path) -> Value {
        serde_json::from_slice(&std::fs::read(file).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_cached_token_is_adopted_without_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "T1", "expires_in": 3600}), 0)
            .await;

        let cached = Token::new("CACHED", Utc::now() + TimeDelta::hours(1));
        FileTokenCache::new(&cache_file).store(&cached).await.unwrap();

        let store = store_for(&server, &cache_file);
        assert_eq!(store.authorize().await.unwrap(), "CACHED");
        assert!(store.is_token_valid().await);
    }

    #[tokio::test]
    async fn test_expired_cache_triggers_one_auth_request() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "T1", "expires_in": 3600}), 1)
            .await;

        let stale = Token::new("STALE", Utc::now() - TimeDelta::minutes(5));
        FileTokenCache::new(&cache_file).store(&stale).await.unwrap();

        let store = store_for(&server, &cache_file);
        assert_eq!(store.authorize().await.unwrap(), "T1");
        assert_eq!(read_cache(&cache_file)["access_token"], "T1");
    }

    #[tokio::test]
    async fn test_successful_auth_persists_cache() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(
            &server,
            json!({"access_token": "T1", "expires_in": 3600, "token_type": "Bearer"}),
            1,
        )
        .await;

        let t0 = unix_seconds(Utc::now());
        let store = store_for(&server, &cache_file);
        store.authorize().await.unwrap();

        let cached = read_cache(&cache_file);
        assert_eq!(cached["access_token"], "T1");
        assert_eq!(cached["token_type"], "Bearer");
        let expiration_time = cached["expiration_time"].as_f64().unwrap();
        assert!((expiration_time - (t0 + 3600.0)).abs() < 5.0);
    }

    #[tokio::test]
    async fn test_missing_access_token_yields_no_token() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"expires_in": 3600}), 1).await;

        let store = store_for(&server, &cache_file);
        let err = store.authorize().await.unwrap_err();

        assert!(err.is_auth_failure());
        assert!(!store.is_token_valid().await);
        assert!(!cache_file.exists());
    }

    #[tokio::test]
    async fn test_expired_token_from_auth_is_rejected() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "DEAD", "expires_in": 0}), 1).await;

        let store = store_for(&server, &cache_file);
        let err = store.ensure_valid_token().await.unwrap_err();

        assert!(err.is_auth_failure());
        assert!(!store.is_token_valid().await);
        assert!(!cache_file.exists());
    }

    #[tokio::test]
    async fn test_expired_cache_removed_when_auth_fails() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let stale = Token::new("STALE", Utc::now() - TimeDelta::minutes(5));
        FileTokenCache::new(&cache_file).store(&stale).await.unwrap();

        let store = store_for(&server, &cache_file);
        let err = store.authorize().await.unwrap_err();

        assert!(err.is_auth_failure());
        assert!(!store.is_token_valid().await);
        assert!(!cache_file.exists());
    }

    #[tokio::test]
    async fn test_rejected_credentials_yield_no_token() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server, &cache_file);
        let err = store.ensure_valid_token().await.unwrap_err();

        assert!(matches!(err, LiveVolError::Authentication(msg) if msg.contains("400")));
        assert!(!cache_file.exists());
    }

    #[tokio::test]
    async fn test_ensure_valid_token_is_idempotent() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "T1", "expires_in": 3600}), 1)
            .await;

        let store = store_for(&server, &cache_file);
        assert_eq!(store.ensure_valid_token().await.unwrap(), "T1");

        // Removing the file proves the second call never looks past the held token
        std::fs::remove_file(&cache_file).unwrap();
        assert_eq!(store.ensure_valid_token().await.unwrap(), "T1");
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_through_to_auth() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "T2", "expires_in": 60}), 1).await;
        std::fs::write(&cache_file, b"garbage").unwrap();

        let store = store_for(&server, &cache_file);
        assert_eq!(store.authorize().await.unwrap(), "T2");
        assert_eq!(read_cache(&cache_file)["access_token"], "T2");
    }

    #[tokio::test]
    async fn test_invalidate_clears_token_and_cache() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "T1", "expires_in": 3600}), 1)
            .await;

        let store = store_for(&server, &cache_file);
        store.ensure_valid_token().await.unwrap();
        assert!(cache_file.exists());

        store.invalidate().await.unwrap();
        assert!(!store.is_token_valid().await);
        assert!(!cache_file.exists());
    }

    #[tokio::test]
    async fn test_invalidate_if_keeps_replaced_token() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let cache_file = cache_path(&dir);
        mount_token_response(&server, json!({"access_token": "T2", "expires_in": 3600}), 1)
            .await;

        let store = store_for(&server, &cache_file);
        store.ensure_valid_token().await.unwrap();

        assert!(!store.invalidate_if("T1").await.unwrap());
        assert!(store.is_token_valid().await);
        assert!(cache_file.exists());

        assert!(store.invalidate_if("T2").await.unwrap());
        assert!(!store.is_token_valid().await);
        assert!(!cache_file.exists());
    }
}
