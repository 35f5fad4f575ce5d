//! File-based token cache implementation.

use async_trait::async_trait;
use livevol_core::{LiveVolError, Result, Token, TokenCache};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Default cache file name, resolved against the working directory.
pub const DEFAULT_TOKEN_FILE: &str = "cboe_auth.json";

/// Token cache backed by a single JSON file.
///
/// The file holds the full authorization response plus the computed
/// `expiration_time`, so it stays readable by other tools. Writes go to a
/// sibling `.tmp` file which is then renamed over the target, so readers never
/// observe a half-written token. A file that fails to decode is deleted and
/// reported as absent.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    /// Create a cache stored at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from(DEFAULT_TOKEN_FILE), ToOwned::to_owned);
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, action: &str, err: &std::io::Error) -> LiveVolError {
        LiveVolError::Cache(format!(
            "failed to {action} {}: {err}",
            self.path.display()
        ))
    }
}

impl Default for FileTokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

#[async_trait]
impl TokenCache for FileTokenCache {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Token>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cached token file");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error("read", &e)),
        };

        match serde_json::from_slice::<Token>(&bytes) {
            Ok(token) => {
                debug!(expiration_time = token.expiration_time, "Read cached token");
                Ok(Some(token))
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable token cache file");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    async fn store(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_vec(token).map_err(|e| LiveVolError::Cache(e.to_string()))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| self.io_error("write", &e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error("replace", &e))?;

        debug!("Persisted token");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Removed cached token file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", &e)),
        }
    }
}
