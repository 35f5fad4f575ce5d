#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/livevol/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Token cache implementations for the LiveVol client.
//!
//! This crate provides implementations of the [`TokenCache`] trait from `livevol-core`:
//!
//! - [`FileTokenCache`] - Persistent single-file JSON cache (default)
//! - [`InMemoryTokenCache`] - Process-local cache for testing
//! - [`NoopTokenCache`] - No-op cache that doesn't store anything

/// File-based cache implementation.
pub mod file;
/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use livevol_core::TokenCache;

// Re-export implementations
pub use file::{DEFAULT_TOKEN_FILE, FileTokenCache};
pub use memory::InMemoryTokenCache;
pub use noop::NoopTokenCache;
