//! In-memory token cache implementation.

use async_trait::async_trait;
use livevol_core::{Result, Token, TokenCache};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory token cache for testing and embedding.
///
/// The token is stored behind a `RwLock` and is lost when the cache is dropped.
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    token: RwLock<Option<Token>>,
}

impl InMemoryTokenCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with a token.
    #[must_use]
    pub fn with_token(token: Token) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Option<Token>> {
        let token = self.token.read().await.clone();
        if token.is_some() {
            debug!("Cache hit for token");
        } else {
            debug!("Cache miss for token");
        }
        Ok(token)
    }

    #[instrument(skip(self, token))]
    async fn store(&self, token: &Token) -> Result<()> {
        *self.token.write().await = Some(token.clone());
        debug!("Cached token");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}
