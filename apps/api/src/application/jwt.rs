use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use pocketbook_types::{TokenClaims, TokenPair, verify_jwt};
use secrecy::{ExposeSecret, SecretString};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

pub fn issue(
    user_id: &str,
    email: &str,
    secret: &SecretString,
    ttl: Duration,
) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let exp = now + ttl.whole_seconds();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp,
        jti: Uuid::new_v4().to_string(),
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verifies signature and expiry with zero leeway.
pub fn verify(token: &str, secret: &SecretString) -> AppResult<TokenClaims> {
    verify_jwt(token, secret.expose_secret().as_bytes(), 0).map_err(|e| {
        debug!(error = %e, "token verification failed");
        AppError::InvalidToken
    })
}

/// Mints and verifies access/refresh pairs.
///
/// Both kinds are HS256 over the same secret and carry the same claims; they
/// differ only in lifetime. Nothing is persisted, so a rotated-out refresh
/// token stays valid until its own expiry.
pub struct TokenIssuer {
    secret: SecretString,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: SecretString, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue_pair(&self, user_id: &str, email: &str) -> AppResult<TokenPair> {
        let access = issue(user_id, email, &self.secret, self.access_ttl)?;
        let refresh = issue(user_id, email, &self.secret, self.refresh_ttl)?;
        Ok(TokenPair::new(access, refresh))
    }

    pub fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        verify(token, &self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            SecretString::new("test-secret".into()),
            Duration::minutes(15),
            Duration::days(1),
        )
    }

    #[test]
    fn test_issue_pair_lifetimes() {
        let issuer = issuer();

        let pair = issuer.issue_pair("user123", "ana@example.com").unwrap();

        let access = issuer.verify(&pair.access_token).unwrap();
        let refresh = issuer.verify(&pair.refresh_token).unwrap();
        assert_eq!(access.sub, "user123");
        assert_eq!(access.email, "ana@example.com");
        assert_eq!(refresh.sub, "user123");
        assert_eq!(access.exp - access.iat, 15 * 60);
        assert_eq!(refresh.exp - refresh.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_pairs_issued_together_are_distinct() {
        let issuer = issuer();

        let first = issuer.issue_pair("user123", "ana@example.com").unwrap();
        let second = issuer.issue_pair("user123", "ana@example.com").unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_ne!(first.access_token, first.refresh_token);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue(
            "user123",
            "ana@example.com",
            &SecretString::new("other-secret".into()),
            Duration::minutes(15),
        )
        .unwrap();

        assert!(matches!(issuer().verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let token = issue(
            "user123",
            "ana@example.com",
            &SecretString::new("test-secret".into()),
            Duration::seconds(-5),
        )
        .unwrap();

        assert!(matches!(issuer().verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(issuer().verify("not-a-jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(issuer().verify(""), Err(AppError::InvalidToken)));
    }
}
