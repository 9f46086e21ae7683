use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;
use time::Duration;

use crate::infra::error::InfraError;

pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(InfraError::ConfigMissing { var: "JWT_SECRET" })?;

        let access_token_ttl_secs: i64 =
            get_env_default("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TOKEN_TTL_SECS);
        let refresh_token_ttl_secs: i64 =
            get_env_default("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TOKEN_TTL_SECS);

        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid {
                    var: "CORS_ORIGIN",
                    reason: "must be a valid header value".into(),
                })?;

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from((Ipv4Addr::LOCALHOST, 4000)),
        );

        let log_format: LogFormat = get_env_default("LOG_FORMAT", String::from("pretty"))
            .parse()
            .map_err(|reason| InfraError::ConfigInvalid {
                var: "LOG_FORMAT",
                reason,
            })?;

        let config = Self {
            jwt_secret: SecretString::new(jwt_secret.into()),
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            refresh_token_ttl: Duration::seconds(refresh_token_ttl_secs),
            cors_origin,
            bind_addr,
            log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Access tokens must be short-lived relative to refresh tokens.
    pub fn validate(&self) -> Result<(), InfraError> {
        if self.access_token_ttl <= Duration::ZERO {
            return Err(InfraError::ConfigInvalid {
                var: "ACCESS_TOKEN_TTL_SECS",
                reason: "must be positive".into(),
            });
        }
        if self.access_token_ttl >= self.refresh_token_ttl {
            return Err(InfraError::ConfigInvalid {
                var: "ACCESS_TOKEN_TTL_SECS",
                reason: "must be shorter than REFRESH_TOKEN_TTL_SECS".into(),
            });
        }
        Ok(())
    }
}
