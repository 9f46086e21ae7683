use thiserror::Error;

/// Infrastructure errors that can occur during application startup.
///
/// Display messages never include configuration values, only variable names.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: environment variable {var} not set")]
    ConfigMissing { var: &'static str },

    #[error("Configuration error: {var} {reason}")]
    ConfigInvalid { var: &'static str, reason: String },

    #[error("TCP bind failed")]
    TcpBind(#[source] std::io::Error),

    #[error("Server error")]
    Server(#[source] std::io::Error),
}
