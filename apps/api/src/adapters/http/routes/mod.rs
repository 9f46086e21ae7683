pub mod graphql;

use axum::{Router, routing::get};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(graphql::router())
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "ok"
}
