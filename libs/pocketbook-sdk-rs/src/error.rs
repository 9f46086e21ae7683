use pocketbook_types::{GraphQLError, is_auth_denied_code};
use thiserror::Error;

/// SDK-specific errors.
///
/// `Clone` because a single refresh outcome is handed to every caller that
/// joined the in-flight attempt.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// A refresh was requested but no refresh token is stored
    #[error("No refresh token available")]
    NoRefreshToken,

    /// The refresh call got no usable response (network, undecodable body)
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// The API answered the refresh call with an error (expired or invalid refresh token)
    #[error("Token refresh rejected: {0}")]
    RefreshRejected(String),

    /// The access token expired and there is no refresh token to renew it
    #[error("Session expired")]
    SessionExpired,

    /// No credentials are stored
    #[error("Not authenticated")]
    Unauthenticated,

    /// The request never got a response
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be interpreted
    #[error("Unknown error: {0}")]
    Unknown(String),

    /// API returned an error; the code is passed through untranslated
    #[error("API error: {}", .0.message)]
    Api(GraphQLError),

    /// Session storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// The machine-readable code of an API error, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.code(),
            _ => None,
        }
    }

    /// Whether the caller should send the user back through login.
    pub fn requires_reauthentication(&self) -> bool {
        match self {
            Self::NoRefreshToken
            | Self::RefreshFailed(_)
            | Self::RefreshRejected(_)
            | Self::SessionExpired
            | Self::Unauthenticated => true,
            Self::Api(err) => err.is_auth_denied(),
            _ => false,
        }
    }

    /// Best-effort human-readable message for display.
    ///
    /// Known API messages are passed through; anything that looks like an
    /// internal detail is replaced with a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Connection error. Check your internet connection.".to_string(),
            Self::NoRefreshToken
            | Self::RefreshFailed(_)
            | Self::RefreshRejected(_)
            | Self::SessionExpired
            | Self::Unauthenticated => "Your session has ended. Please sign in again.".to_string(),
            Self::Api(err) => {
                if err.code().is_some_and(|c| c.eq_ignore_ascii_case("INTERNAL_SERVER_ERROR"))
                    || looks_internal(&err.message)
                {
                    "Internal server error. Please try again later.".to_string()
                } else if err.code().is_some_and(is_auth_denied_code) {
                    "Your session has ended. Please sign in again.".to_string()
                } else {
                    err.message.clone()
                }
            }
            Self::Unknown(_) | Self::Storage(_) | Self::Config(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

fn looks_internal(message: &str) -> bool {
    const MARKERS: &[&str] = &[
        "panicked at",
        "stack backtrace",
        "ECONNREFUSED",
        "ETIMEDOUT",
        ".rs:",
        "src/",
    ];
    MARKERS.iter().any(|m| message.contains(m))
}

/// Failure of the durable key-value area holding the session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<StorageError> for ClientError {
    fn from(e: StorageError) -> Self {
        ClientError::Storage(e.to_string())
    }
}

/// No response was obtained from the API.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);
