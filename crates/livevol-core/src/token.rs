//! Credentials and bearer tokens.
//!
//! - [`Credentials`] - OAuth2 client id/secret pair
//! - [`Token`] - Bearer token with its absolute expiration time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{LiveVolError, Result};

/// OAuth2 client credentials used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// A bearer token as persisted in the token cache.
///
/// Besides the access token and its computed `expiration_time` (Unix seconds),
/// every other field of the authorization response is kept in `extra` so the
/// cache file holds the full response.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The opaque bearer credential.
    pub access_token: String,
    /// Absolute expiry as fractional Unix seconds.
    pub expiration_time: f64,
    /// Remaining fields from the authorization response (`expires_in`, `token_type`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Token {
    /// Creates a token expiring at the given instant.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expiration_time: unix_seconds(expires_at),
            extra: Map::new(),
        }
    }

    /// Builds a token from a client-credentials response body received at `now`.
    ///
    /// The body must be a JSON object with a string `access_token` and a positive
    /// numeric `expires_in` (seconds).
    ///
    /// # Errors
    /// Returns [`LiveVolError::Authentication`] if either field is missing or mistyped,
    /// or if `expires_in` would make the token expired on arrival.
    pub fn from_auth_response(body: Value, now: DateTime<Utc>) -> Result<Self> {
        let Value::Object(mut fields) = body else {
            return Err(LiveVolError::Authentication(
                "token response is not a JSON object".to_string(),
            ));
        };

        let access_token = match fields.remove("access_token") {
            Some(Value::String(token)) => token,
            _ => {
                return Err(LiveVolError::Authentication(
                    "token response has no access_token".to_string(),
                ));
            }
        };

        let expires_in = fields
            .get("expires_in")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                LiveVolError::Authentication("token response has no expires_in".to_string())
            })?;
        if !expires_in.is_finite() || expires_in <= 0.0 {
            return Err(LiveVolError::Authentication(format!(
                "token response has non-positive expires_in: {expires_in}"
            )));
        }

        fields.remove("expiration_time");

        Ok(Self {
            access_token,
            expiration_time: unix_seconds(now) + expires_in,
            extra: fields,
        })
    }

    /// Returns true if the token is still usable at `now` (expiry strictly in the future).
    ///
    /// A token expiring exactly at `now` is no longer usable.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time > unix_seconds(now)
    }

    /// Returns the expiry as a timestamp, if representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis((self.expiration_time * 1000.0) as i64)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("expiration_time", &self.expiration_time)
            .finish_non_exhaustive()
    }
}

/// Converts a timestamp to fractional Unix seconds.
#[must_use]
pub fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use serde_json::json;

    #[test]
    fn test_from_auth_response() {
        let now = Utc::now();
        let body = json!({
            "access_token": "T1",
            "expires_in": 3600,
            "token_type": "Bearer",
        });

        let token = Token::from_auth_response(body, now).unwrap();
        assert_eq!(token.access_token, "T1");
        assert!((token.expiration_time - (unix_seconds(now) + 3600.0)).abs() < 1e-6);
        assert_eq!(token.extra.get("token_type"), Some(&json!("Bearer")));
        assert_eq!(token.extra.get("expires_in"), Some(&json!(3600)));
    }

    #[test]
    fn test_from_auth_response_missing_fields() {
        let now = Utc::now();

        let err = Token::from_auth_response(json!({"expires_in": 3600}), now).unwrap_err();
        assert!(err.is_auth_failure());

        let err = Token::from_auth_response(json!({"access_token": "T1"}), now).unwrap_err();
        assert!(err.is_auth_failure());

        let err = Token::from_auth_response(json!({"access_token": 7, "expires_in": 1}), now)
            .unwrap_err();
        assert!(err.is_auth_failure());

        let err = Token::from_auth_response(json!(["T1"]), now).unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_from_auth_response_rejects_non_positive_lifetime() {
        let now = Utc::now();

        for expires_in in [json!(0), json!(-30), json!(0.0)] {
            let body = json!({"access_token": "DEAD", "expires_in": expires_in});
            let err = Token::from_auth_response(body, now).unwrap_err();
            assert!(matches!(err, LiveVolError::Authentication(msg) if msg.contains("expires_in")));
        }
    }

    #[test]
    fn test_validity_boundaries() {
        let now = Utc::now();
        let token = Token::new("T1", now);

        assert!(!token.is_valid_at(now));
        assert!(token.is_valid_at(now - TimeDelta::seconds(1)));
        assert!(!token.is_valid_at(now + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_serialized_layout() {
        let body = json!({"access_token": "T1", "expires_in": 60, "scope": "api"});
        let token = Token::from_auth_response(body, Utc::now()).unwrap();

        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(value["access_token"], "T1");
        assert_eq!(value["expires_in"], 60);
        assert_eq!(value["scope"], "api");
        assert!(value["expiration_time"].is_f64());

        let restored: Token = serde_json::from_value(value).unwrap();
        assert_eq!(restored, token);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("client", "super_secret");
        let token = Token::new("bearer_value", Utc::now());

        let debug_str = format!("{credentials:?} {token:?}");
        assert!(!debug_str.contains("super_secret"));
        assert!(!debug_str.contains("bearer_value"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
