//! Client-side expiry estimation.
//!
//! Relies on the unverified claims decoder, so the answer is advisory: it
//! decides when to refresh proactively and nothing else.

use pocketbook_types::decode_unverified;
use time::OffsetDateTime;
use tracing::warn;

/// What the client can tell about a token's remaining lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// Valid for longer than the leeway window
    Fresh,
    /// Not yet expired, but expires within the leeway window
    Expiring,
    /// Already expired
    Expired,
    /// Payload could not be decoded or carries no `exp` claim
    Undetermined,
}

/// How an [`ExpiryStatus::Undetermined`] token is treated by [`is_expired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFailurePolicy {
    /// Treat as not expired and let the API judge the token
    #[default]
    FailOpen,
    /// Treat as expired, forcing a refresh or re-authentication
    FailClosed,
}

/// Evaluates a token against the current clock.
pub fn evaluate(token: &str, leeway_seconds: u64) -> ExpiryStatus {
    evaluate_at(token, leeway_seconds, OffsetDateTime::now_utc().unix_timestamp())
}

/// Evaluates a token against `now` (Unix seconds).
pub fn evaluate_at(token: &str, leeway_seconds: u64, now: i64) -> ExpiryStatus {
    let exp = match decode_unverified(token) {
        Ok(claims) => claims.exp,
        Err(e) => {
            warn!(error = %e, "access token payload is not decodable");
            return ExpiryStatus::Undetermined;
        }
    };

    let Some(exp) = exp else {
        warn!("access token carries no exp claim");
        return ExpiryStatus::Undetermined;
    };

    let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
    if now >= exp {
        ExpiryStatus::Expired
    } else if now.saturating_add(leeway) >= exp {
        ExpiryStatus::Expiring
    } else {
        ExpiryStatus::Fresh
    }
}

impl ExpiryStatus {
    /// Whether the token is expired or expires within the leeway window.
    pub fn needs_refresh(self, policy: DecodeFailurePolicy) -> bool {
        match self {
            Self::Fresh => false,
            Self::Expiring | Self::Expired => true,
            Self::Undetermined => policy == DecodeFailurePolicy::FailClosed,
        }
    }

    /// Whether the token is past its expiry (leeway not applied).
    pub fn is_past_expiry(self, policy: DecodeFailurePolicy) -> bool {
        match self {
            Self::Expired => true,
            Self::Fresh | Self::Expiring => false,
            Self::Undetermined => policy == DecodeFailurePolicy::FailClosed,
        }
    }
}

/// True if `now + leeway >= exp`.
///
/// Undecodable tokens follow `policy`.
pub fn is_expired(token: &str, leeway_seconds: u64, policy: DecodeFailurePolicy) -> bool {
    evaluate(token, leeway_seconds).needs_refresh(policy)
}
