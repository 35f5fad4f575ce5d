//! No-op token cache implementation.

use async_trait::async_trait;
use livevol_core::{Result, Token, TokenCache};
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// `load` always returns `Ok(None)`, so every authorization goes to the network.
/// Useful for disabling on-disk persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTokenCache;

impl NoopTokenCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenCache for NoopTokenCache {
    async fn load(&self) -> Result<Option<Token>> {
        trace!("NoopTokenCache: load called, returning None");
        Ok(None)
    }

    async fn store(&self, _token: &Token) -> Result<()> {
        trace!("NoopTokenCache: store called, doing nothing");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopTokenCache: clear called, doing nothing");
        Ok(())
    }
}
