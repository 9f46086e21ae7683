use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Claims carried by both access and refresh tokens.
///
/// Issued by the Pocketbook API and verified with [`crate::verify_jwt`].
/// The two token kinds differ only in lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// User's email address at issuance time
    pub email: String,

    /// Token expiration (Unix timestamp)
    pub exp: i64,

    /// Token issued at (Unix timestamp)
    pub iat: i64,

    /// Unique token id, keeps two tokens minted in the same second distinct
    pub jti: String,
}

/// Claims read from a token without checking its signature.
///
/// Every field is optional: this view is advisory and only drives the
/// client's proactive refresh heuristic. It is never proof of identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UnverifiedClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    /// Any JSON number is accepted; fractional seconds are floored.
    #[serde(default, deserialize_with = "numeric_date")]
    pub exp: Option<i64>,
}

fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64)),
        _ => None,
    })
}

/// An access/refresh token pair.
///
/// Serialized with the wire names used by the GraphQL API
/// (`token`, `refreshToken`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token, sent as a bearer credential
    #[serde(rename = "token")]
    pub access_token: String,

    /// Longer-lived refresh token, only ever sent in a refresh operation body
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}
