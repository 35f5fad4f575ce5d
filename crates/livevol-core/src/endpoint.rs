//! Market-data endpoint definitions.
//!
//! This module defines [`Endpoint`], the closed set of read-only query paths
//! under `live/allaccess/market/` served by the LiveVol API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LiveVolError;

/// Path prefix shared by every market-data endpoint, relative to the API base URL.
pub const MARKET_PATH: &str = "live/allaccess/market";

/// A LiveVol market-data endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    /// Option chain quotes together with the underlying quote.
    OptionAndUnderlyingQuotes,
    /// Underlying quotes only.
    UnderlyingQuotes,
    /// Every option trade for a root.
    AllOptionTrades,
    /// Option trades aggregated by side and size.
    OptionTradesBreakdown,
    /// FLEX option trades.
    FlexTrades,
    /// Trading halts.
    Halts,
    /// Limit up/limit down bands for an underlying.
    UnderlyingLimitUpLimitDown,
}

impl Endpoint {
    /// All endpoints, in documentation order.
    pub const ALL: [Self; 7] = [
        Self::OptionAndUnderlyingQuotes,
        Self::UnderlyingQuotes,
        Self::AllOptionTrades,
        Self::OptionTradesBreakdown,
        Self::FlexTrades,
        Self::Halts,
        Self::UnderlyingLimitUpLimitDown,
    ];

    /// Returns the path segment for this endpoint (e.g., `"all-option-trades"`).
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::OptionAndUnderlyingQuotes => "option-and-underlying-quotes",
            Self::UnderlyingQuotes => "underlying-quotes",
            Self::AllOptionTrades => "all-option-trades",
            Self::OptionTradesBreakdown => "option-trades-breakdown",
            Self::FlexTrades => "flex-trades",
            Self::Halts => "halts",
            Self::UnderlyingLimitUpLimitDown => "underlying-limit-up-limit-down",
        }
    }

    /// Returns a human-readable label used in log output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OptionAndUnderlyingQuotes => "Options and Underlying Quotes",
            Self::UnderlyingQuotes => "Underlying Quotes",
            Self::AllOptionTrades => "Trades",
            Self::OptionTradesBreakdown => "Option Trades Breakdown",
            Self::FlexTrades => "Flex Trades",
            Self::Halts => "Halts",
            Self::UnderlyingLimitUpLimitDown => "Underlying Limit Up/Down",
        }
    }

    /// Returns the path relative to the API base URL.
    #[must_use]
    pub fn relative_path(&self) -> String {
        format!("{MARKET_PATH}/{}", self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Endpoint {
    type Err = LiveVolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.path() == s)
            .ok_or_else(|| LiveVolError::InvalidParameter(format!("Unknown endpoint: {s}")))
    }
}
