//! Test utilities: a scriptable transport and token builders.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use pocketbook_types::{GraphQLError, GraphQLRequest};
use serde_json::{Value, json};

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport};

type Handler =
    Box<dyn Fn(&GraphQLRequest, Option<&str>) -> Result<RawResponse, TransportError> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub bearer: Option<String>,
    pub variables: Value,
}

/// Transport answering every call through a closure and recording it.
pub struct MockTransport {
    handler: Handler,
    delay: Duration,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&GraphQLRequest, Option<&str>) -> Result<RawResponse, TransportError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            handler: Box::new(handler),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Suspends every call for `delay`, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn bearers_for(&self, operation: &str) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .map(|c| c.bearer.clone())
            .collect()
    }

    pub fn variables_for(&self, operation: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .map(|c| c.variables.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: &GraphQLRequest,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            operation: request.resolved_operation_name().unwrap_or_default().to_string(),
            bearer: bearer.map(str::to_string),
            variables: request.variables.clone(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        (self.handler)(request, bearer)
    }
}

pub fn raw(status: u16, body: &[u8]) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status,
        body: body.to_vec(),
    })
}

/// 200 response with `{"data": data}`.
pub fn graphql_data(data: Value) -> Result<RawResponse, TransportError> {
    raw(200, &serde_json::to_vec(&json!({ "data": data })).unwrap())
}

/// 200 response with a single error carrying `code`.
pub fn graphql_error(message: &str, code: &str) -> Result<RawResponse, TransportError> {
    let body = json!({ "data": null, "errors": [GraphQLError::new(message, code)] });
    raw(200, &serde_json::to_vec(&body).unwrap())
}

pub fn auth_denied(message: &str) -> Result<RawResponse, TransportError> {
    graphql_error(message, "UNAUTHENTICATED")
}

pub fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// A signed token (test secret) expiring at `exp`.
pub fn token_expiring_at(exp: i64) -> String {
    sign(json!({
        "sub": "user123",
        "email": "user@example.com",
        "iat": now(),
        "exp": exp,
        "jti": uuid::Uuid::new_v4().to_string(),
    }))
}

/// A signed token expiring `secs` from now (negative for the past).
pub fn token_expiring_in(secs: i64) -> String {
    token_expiring_at(now() + secs)
}

/// A signed token with a fractional `exp`, as some issuers emit.
pub fn token_with_fractional_exp(exp: f64) -> String {
    sign(json!({ "sub": "user123", "email": "user@example.com", "exp": exp }))
}

pub fn token_without_exp() -> String {
    sign(json!({ "sub": "user123", "email": "user@example.com" }))
}

fn sign(claims: Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}
