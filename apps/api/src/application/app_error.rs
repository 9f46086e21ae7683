use pocketbook_types::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid or expired refresh token")]
    InvalidToken,

    #[error("User not found")]
    SubjectNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    AlreadyExists,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wire code reported in `errors[].extensions.code`.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidToken
            | AppError::SubjectNotFound
            | AppError::InvalidCredentials
            | AppError::Unauthenticated => ErrorCode::Unauthenticated,
            AppError::AlreadyExists | AppError::InvalidInput(_) => ErrorCode::BadUserInput,
            AppError::UnknownOperation(_) => ErrorCode::GraphqlValidationFailed,
            AppError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
