#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/livevol/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface for the LiveVol market-data API.
//!
//! This crate re-exports the core types, token caches and HTTP client, and
//! provides [`write_json_file`] for saving query results.
//!
//! # Example
//!
//! ```rust,ignore
//! use livevol::{LiveVolClient, MarketDataProvider, QueryParams, write_json_file};
//!
//! #[tokio::main]
//! async fn main() -> livevol::Result<()> {
//!     let client = LiveVolClient::new("client_id", "client_secret");
//!     client.authorize().await?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let mut params = QueryParams::new().symbol("SPY").root("SPY").date(today);
//!
//!     let breakdown = client.option_trades_breakdown(&params).await?;
//!     write_json_file("breakdown.json", &breakdown.data).await?;
//!
//!     let options = client.option_and_underlying_quotes(&params).await?;
//!     write_json_file("options.json", &options.data).await?;
//!
//!     params.insert("order_by", "SIZE_DESC");
//!     let trades = client.all_option_trades(&params).await?;
//!     write_json_file("trades.json", &trades.data).await?;
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use livevol_core::*;

// Token cache implementations
pub use livevol_cache::{DEFAULT_TOKEN_FILE, FileTokenCache, InMemoryTokenCache, NoopTokenCache};

// Client
pub use livevol_client::{
    ClientConfig, LiveVolClient, POINTS_USED_HEADER, TokenStore, credentials_from_env,
    credentials_from_lookup,
};

mod output;
pub use output::write_json_file;
