//! Provider trait for querying market data.
//!
//! [`MarketDataProvider`] exposes one generic [`query`](MarketDataProvider::query)
//! plus a named method per [`Endpoint`]. The named methods share the same
//! request/response contract and differ only in the path they hit.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    endpoint::Endpoint,
    error::Result,
    query::{QueryParams, QueryResponse},
};

/// Source of LiveVol market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync + Debug {
    /// Returns the name of this provider.
    fn name(&self) -> &str;

    /// Queries `endpoint` with the given parameters.
    ///
    /// Returns the decoded JSON body on HTTP 200. Any other status, a transport
    /// failure, or an undecodable body is returned as an error; nothing is retried.
    async fn query(&self, endpoint: Endpoint, params: &QueryParams) -> Result<QueryResponse>;

    /// Fetches option chain quotes together with the underlying quote.
    async fn option_and_underlying_quotes(&self, params: &QueryParams) -> Result<QueryResponse> {
        self.query(Endpoint::OptionAndUnderlyingQuotes, params).await
    }

    /// Fetches underlying quotes.
    async fn underlying_quotes(&self, params: &QueryParams) -> Result<QueryResponse> {
        self.query(Endpoint::UnderlyingQuotes, params).await
    }

    /// Fetches every option trade matching the parameters.
    async fn all_option_trades(&self, params: &QueryParams) -> Result<QueryResponse> {
        self.query(Endpoint::AllOptionTrades, params).await
    }

    /// Fetches the option trades breakdown.
    async fn option_trades_breakdown(&self, params: &QueryParams) -> Result<QueryResponse> {
        self.query(Endpoint::OptionTradesBreakdown, params).await
    }

    /// Fetches FLEX option trades.
    async fn flex_trades(&self, params: &QueryParams) -> Result<QueryResponse> {
        self.query(Endpoint::FlexTrades, params).await
    }

    /// Fetches trading halts.
    async fn halts(&self, params: &QueryParams) -> Result<QueryResponse> {
        self.query(Endpoint::Halts, params).await
    }

    /// Fetches limit up/limit down events for an underlying.
    async fn underlying_limit_up_limit_down(
        &self,
        params: &QueryParams,
    ) -> Result<QueryResponse> {
        self.query(Endpoint::UnderlyingLimitUpLimitDown, params).await
    }
}
