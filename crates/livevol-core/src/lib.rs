#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/livevol/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the LiveVol market-data client.
//!
//! This crate provides the abstractions shared by the cache and client crates:
//!
//! - [`MarketDataProvider`](provider::MarketDataProvider) - Query trait with one method per endpoint
//! - [`TokenCache`](cache::TokenCache) - Bearer token persistence
//! - [`Token`](token::Token) and [`Credentials`](token::Credentials) - OAuth2 material
//! - [`QueryParams`](query::QueryParams) and [`QueryResponse`](query::QueryResponse) - Request and result

/// Token cache trait.
pub mod cache;
/// Market-data endpoint definitions.
pub mod endpoint;
/// Error types for client operations.
pub mod error;
/// Provider trait for querying market data.
pub mod provider;
/// Query parameters and result envelope.
pub mod query;
/// Credentials and bearer tokens.
pub mod token;

// Re-export commonly used items at crate root
pub use cache::TokenCache;
pub use endpoint::{Endpoint, MARKET_PATH};
pub use error::{LiveVolError, Result};
pub use provider::MarketDataProvider;
pub use query::{QueryParams, QueryResponse};
pub use token::{Credentials, Token, unix_seconds};
