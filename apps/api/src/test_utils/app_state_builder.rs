//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates a minimal `AppState`
//! over an in-memory user store for testing HTTP endpoints.

use std::sync::Arc;

use time::Duration;

use crate::{
    adapters::{http::app_state::AppState, persistence::InMemoryUserRepo},
    application::use_cases::auth::UserProfile,
    infra::setup::init_app_state_with_repo,
    test_utils::test_config,
};

/// Builder for creating `AppState` with in-memory storage for testing.
///
/// # Example
///
/// ```ignore
/// let user = create_test_user(|u| u.email = "ana@example.com".to_string());
///
/// let (app_state, repo) = TestAppStateBuilder::new()
///     .with_user(user)
///     .build();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    users: Vec<UserProfile>,
    access_token_ttl: Option<Duration>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = Some(ttl);
        self
    }

    /// Returns the state and a handle to its user store.
    pub fn build(self) -> (AppState, Arc<InMemoryUserRepo>) {
        let mut config = test_config();
        if let Some(ttl) = self.access_token_ttl {
            config.access_token_ttl = ttl;
        }

        let repo = Arc::new(InMemoryUserRepo::with_users(self.users));
        let app_state = init_app_state_with_repo(config, repo.clone());
        (app_state, repo)
    }
}
