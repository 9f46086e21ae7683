use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes carried in `errors[].extensions.code` of API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    Forbidden,
    NotFound,
    BadUserInput,
    GraphqlValidationFailed,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::BadUserInput => "BAD_USER_INPUT",
            Self::GraphqlValidationFailed => "GRAPHQL_VALIDATION_FAILED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a raw error code means "authentication denied".
///
/// Matches `UNAUTHENTICATED` and `UNAUTHORIZED`, case-insensitively.
pub fn is_auth_denied_code(code: &str) -> bool {
    code.eq_ignore_ascii_case("UNAUTHENTICATED") || code.eq_ignore_ascii_case("UNAUTHORIZED")
}

/// JWT verification errors.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("JWT library error: {0}")]
    Library(#[from] jsonwebtoken::errors::Error),
}
