use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};

use crate::{JwtError, TokenClaims, UnverifiedClaims};

/// Verifies a token's HS256 signature and expiry and returns its claims.
///
/// # Arguments
/// * `token` - The JWT token string
/// * `secret` - The shared signing secret
/// * `leeway_seconds` - Tolerance for clock skew (the API uses 0)
///
/// # Returns
/// The verified `TokenClaims` or a `JwtError`.
pub fn verify_jwt(token: &str, secret: &[u8], leeway_seconds: u64) -> Result<TokenClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway_seconds;

    let token_data = decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Library(e),
        })?;

    Ok(token_data.claims)
}

/// Reads a token's claims without verifying the signature.
///
/// Used by clients to estimate expiry without a round trip.
///
/// # Security Note
/// This function does NOT verify the token. The returned claims may be
/// forged and must only feed the proactive-refresh heuristic, never an
/// authentication or authorization decision. Use [`verify_jwt`] for that.
pub fn decode_unverified(token: &str) -> Result<UnverifiedClaims, JwtError> {
    if token.split('.').count() != 3 {
        return Err(JwtError::InvalidFormat("expected 3 segments".into()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<UnverifiedClaims>(
        token,
        &DecodingKey::from_secret(b"ignored"), // Key is ignored when validation is disabled
        &validation,
    )?;

    Ok(token_data.claims)
}
