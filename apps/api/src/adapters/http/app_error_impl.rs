use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pocketbook_types::{GraphQLError, GraphQLResponse};

use crate::app_error::AppError;

/// Resolver errors travel in the GraphQL envelope with HTTP 200; only a
/// request naming no known operation is rejected outright.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownOperation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        };

        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => {
                tracing::debug!(error = %other, code = %other.code(), "Request rejected");
                other.to_string()
            }
        };

        let body: GraphQLResponse = GraphQLResponse {
            data: None,
            errors: vec![GraphQLError::new(message, self.code().as_str())],
        };
        (status, Json(body)).into_response()
    }
}
