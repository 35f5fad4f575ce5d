//! Cache trait for persisting bearer tokens.
//!
//! This module defines the [`TokenCache`] trait that lets the client reuse a
//! still-valid token across process invocations instead of re-authenticating.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Result, token::Token};

/// Trait for storing the current bearer token.
///
/// A cache holds at most one token. Implementations treat their backing store
/// as disposable: an unreadable entry is reported as absent, not as an error.
#[async_trait]
pub trait TokenCache: Send + Sync + Debug {
    /// Retrieves the cached token.
    ///
    /// Returns `Ok(Some(token))` if a token is stored, `Ok(None)` if not.
    /// Expiry is not checked here.
    async fn load(&self) -> Result<Option<Token>>;

    /// Stores a token, replacing any previous one.
    async fn store(&self, token: &Token) -> Result<()>;

    /// Removes the cached token. Clearing an empty cache succeeds.
    async fn clear(&self) -> Result<()>;
}
