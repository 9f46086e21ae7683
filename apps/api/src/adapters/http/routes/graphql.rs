//! `POST /graphql`: the auth operations behind a GraphQL-shaped envelope.
//!
//! Only named operations are served; the selection set in the document is
//! not interpreted and every operation returns its full payload.

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use pocketbook_types::{GraphQLRequest, GraphQLResponse};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    adapters::http::{app_state::AppState, middleware::BearerToken},
    app_error::{AppError, AppResult},
};

#[derive(Deserialize)]
struct Variables<T> {
    input: T,
}

#[derive(Deserialize)]
struct LoginInput {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterInput {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenInput {
    refresh_token: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", post(graphql))
}

async fn graphql(
    State(app_state): State<AppState>,
    Extension(BearerToken(bearer)): Extension<BearerToken>,
    payload: Result<Json<GraphQLRequest>, JsonRejection>,
) -> AppResult<Json<GraphQLResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let data = resolve(&app_state, &request, bearer.as_deref()).await?;
    Ok(Json(GraphQLResponse {
        data: Some(data),
        errors: Vec::new(),
    }))
}

async fn resolve(
    app_state: &AppState,
    request: &GraphQLRequest,
    bearer: Option<&str>,
) -> AppResult<Value> {
    let auth = &app_state.auth_use_cases;

    match request.resolved_operation_name() {
        Some("Login") => {
            let input: LoginInput = input(request)?;
            let payload = auth.login(&input.email, &input.password).await?;
            field("login", payload)
        }
        Some("Register") => {
            let input: RegisterInput = input(request)?;
            let payload = auth
                .register(&input.name, &input.email, &input.password)
                .await?;
            field("register", payload)
        }
        Some("RefreshToken") => {
            let input: RefreshTokenInput = input(request)?;
            let pair = auth.refresh(&input.refresh_token).await?;
            field("refreshToken", pair)
        }
        Some("Me") => {
            let user = auth.current_user(bearer).await?;
            field("me", user)
        }
        Some(other) => Err(AppError::UnknownOperation(other.to_string())),
        None => Err(AppError::UnknownOperation("anonymous operation".into())),
    }
}

fn input<T: DeserializeOwned>(request: &GraphQLRequest) -> AppResult<T> {
    serde_json::from_value::<Variables<T>>(request.variables.clone())
        .map(|v| v.input)
        .map_err(|e| AppError::InvalidInput(format!("Invalid variables: {e}")))
}

fn field(name: &str, value: impl Serialize) -> AppResult<Value> {
    let value = serde_json::to_value(value).map_err(|e| AppError::Internal(e.to_string()))?;
    let mut data = Map::new();
    data.insert(name.to_string(), value);
    Ok(Value::Object(data))
}
