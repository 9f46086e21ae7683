use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{http::app_state::AppState, persistence::InMemoryUserRepo},
    application::jwt::TokenIssuer,
    infra::config::{AppConfig, LogFormat},
    use_cases::auth::{AuthUseCases, UserRepo},
};

/// Wires use cases over the in-memory user store.
pub fn init_app_state(config: AppConfig) -> AppState {
    let user_repo = Arc::new(InMemoryUserRepo::new()) as Arc<dyn UserRepo>;
    init_app_state_with_repo(config, user_repo)
}

pub fn init_app_state_with_repo(config: AppConfig, user_repo: Arc<dyn UserRepo>) -> AppState {
    let issuer = TokenIssuer::new(
        SecretString::new(config.jwt_secret.expose_secret().into()),
        config.access_token_ttl,
        config.refresh_token_ttl,
    );
    let auth_use_cases = AuthUseCases::new(user_repo, issuer);

    AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pocketbook_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(false) // don’t show target (module path)
                    .with_level(true)
                    .pretty(),
            )
            .try_init()
            .ok(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .ok(),
    };
}
