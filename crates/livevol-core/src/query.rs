//! Query parameters and result envelope.
//!
//! - [`QueryParams`] - Caller-supplied query string for a market-data request
//! - [`QueryResponse`] - Decoded response body plus quota usage

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::endpoint::Endpoint;

/// Query string parameters for a market-data request.
///
/// Keys and values are passed to the API unmodified. The helpers cover the
/// keys used across endpoints; anything else goes through [`QueryParams::with`].
///
/// ```
/// use livevol_core::QueryParams;
///
/// let params = QueryParams::new()
///     .symbol("SPY")
///     .root("SPY")
///     .with("order_by", "SIZE_DESC");
/// assert_eq!(params.symbol_or_default(), "SPY");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an arbitrary parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets the `symbol` parameter.
    #[must_use]
    pub fn symbol(self, symbol: impl Into<String>) -> Self {
        self.with("symbol", symbol)
    }

    /// Sets the `root` parameter (option root symbol).
    #[must_use]
    pub fn root(self, root: impl Into<String>) -> Self {
        self.with("root", root)
    }

    /// Sets the `date` parameter, formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn date(self, date: NaiveDate) -> Self {
        self.with("date", date.format("%Y-%m-%d").to_string())
    }

    /// Sets the `order_by` parameter (e.g. `SIZE_DESC`).
    #[must_use]
    pub fn order_by(self, order_by: impl Into<String>) -> Self {
        self.with("order_by", order_by)
    }

    /// Inserts a parameter in place, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the `symbol` parameter, used to label diagnostics.
    #[must_use]
    pub fn symbol_or_default(&self) -> &str {
        self.get("symbol").unwrap_or("<none>")
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for QueryParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for QueryParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// A successful market-data response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The endpoint that produced this response.
    pub endpoint: Endpoint,
    /// The decoded response body, passed through without schema validation.
    pub data: Value,
    /// Value of the `x-monthly-points-used` header, when the server sent one.
    pub points_used: Option<u64>,
}

impl QueryResponse {
    /// Creates a response envelope.
    #[must_use]
    pub const fn new(endpoint: Endpoint, data: Value, points_used: Option<u64>) -> Self {
        Self {
            endpoint,
            data,
            points_used,
        }
    }

    /// Consumes the envelope, returning the decoded body.
    #[must_use]
    pub fn into_data(self) -> Value {
        self.data
    }
}
