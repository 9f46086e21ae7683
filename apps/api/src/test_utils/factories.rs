//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use secrecy::SecretString;
use time::Duration;
use uuid::Uuid;

use crate::{
    adapters::persistence::InMemoryUserRepo,
    application::{
        jwt::TokenIssuer,
        use_cases::auth::{AuthUseCases, UserProfile, hash_password},
    },
    infra::config::{AppConfig, DEFAULT_ACCESS_TOKEN_TTL_SECS, DEFAULT_REFRESH_TOKEN_TTL_SECS, LogFormat},
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Password every factory-made user logs in with.
pub const TEST_PASSWORD: &str = "password123";

/// Create a test user with sensible defaults.
pub fn create_test_user(overrides: impl FnOnce(&mut UserProfile)) -> UserProfile {
    let mut user = UserProfile {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: format!("user-{}@example.com", Uuid::new_v4().simple()),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        created_at: test_datetime(),
        updated_at: test_datetime(),
    };
    overrides(&mut user);
    user
}

pub fn test_datetime() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
        access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECS),
        refresh_token_ttl: Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        cors_origin: "http://localhost:3000".parse().unwrap(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_format: LogFormat::Pretty,
    }
}

/// Issuer sharing the secret and TTLs of [`test_config`].
pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(
        SecretString::new(TEST_JWT_SECRET.into()),
        Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECS),
        Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS),
    )
}

pub fn test_auth_use_cases(users: Vec<UserProfile>) -> (AuthUseCases, Arc<InMemoryUserRepo>) {
    let repo = Arc::new(InMemoryUserRepo::with_users(users));
    (AuthUseCases::new(repo.clone(), test_issuer()), repo)
}
