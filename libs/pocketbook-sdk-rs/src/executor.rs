//! Authenticated request execution.
//!
//! Each authenticated request is a fixed two-step machine: a first attempt
//! and, only if the API denies authentication, one fallback attempt after a
//! refresh. There is no third attempt.

use std::sync::Arc;

use pocketbook_types::{GraphQLError, GraphQLRequest, GraphQLResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::expiry::{self, DecodeFailurePolicy};
use crate::refresh::RefreshCoordinator;
use crate::session::SessionStore;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Fallback,
}

/// A decoded response that is either usable or an authentication denial.
enum Reply {
    Data(Value),
    AuthDenied(GraphQLError),
}

pub struct RequestExecutor {
    session: SessionStore,
    coordinator: RefreshCoordinator,
    transport: Arc<dyn Transport>,
    leeway_seconds: u64,
    decode_failure: DecodeFailurePolicy,
}

impl RequestExecutor {
    pub fn new(
        session: SessionStore,
        coordinator: RefreshCoordinator,
        transport: Arc<dyn Transport>,
        leeway_seconds: u64,
        decode_failure: DecodeFailurePolicy,
    ) -> Self {
        Self {
            session,
            coordinator,
            transport,
            leeway_seconds,
            decode_failure,
        }
    }

    /// Runs an operation with the session's bearer credential.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphQLRequest,
    ) -> Result<T, ClientError> {
        let token = self.preflight().await?;

        let data = match self.dispatch(request, Some(&token), Attempt::First).await? {
            Reply::Data(data) => data,
            Reply::AuthDenied(err) => {
                warn!(
                    operation = ?request.resolved_operation_name(),
                    message = %err.message,
                    "request denied, refreshing and retrying once"
                );
                let token = self.coordinator.refresh().await?;
                match self.dispatch(request, Some(&token), Attempt::Fallback).await? {
                    Reply::Data(data) => data,
                    Reply::AuthDenied(err) => return Err(ClientError::Api(err)),
                }
            }
        };

        decode_data(data)
    }

    /// Runs an operation without any credential. No preflight, no retry.
    pub async fn execute_public<T: DeserializeOwned>(
        &self,
        request: &GraphQLRequest,
    ) -> Result<T, ClientError> {
        match self.dispatch(request, None, Attempt::First).await? {
            Reply::Data(data) => decode_data(data),
            Reply::AuthDenied(err) => Err(ClientError::Api(err)),
        }
    }

    /// Picks the token for a request, refreshing first when needed.
    async fn preflight(&self) -> Result<String, ClientError> {
        let access = self.session.access_token().await?;
        let has_refresh = self.session.refresh_token().await?.is_some();

        let Some(access) = access else {
            if has_refresh {
                debug!("no access token stored, refreshing");
                return self.coordinator.refresh().await;
            }
            return Err(ClientError::Unauthenticated);
        };

        let status = expiry::evaluate(&access, self.leeway_seconds);

        if has_refresh {
            if status.needs_refresh(self.decode_failure) {
                debug!(?status, "refreshing access token proactively");
                return self.coordinator.refresh().await;
            }
        } else if status.is_past_expiry(self.decode_failure) {
            warn!("access token expired and no refresh token stored");
            self.session.clear().await?;
            return Err(ClientError::SessionExpired);
        }

        Ok(access)
    }

    async fn dispatch(
        &self,
        request: &GraphQLRequest,
        bearer: Option<&str>,
        attempt: Attempt,
    ) -> Result<Reply, ClientError> {
        debug!(operation = ?request.resolved_operation_name(), ?attempt, "dispatching request");

        let response = self
            .transport
            .send(request, bearer)
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let body: GraphQLResponse = serde_json::from_slice(&response.body).map_err(|_| {
            ClientError::Unknown(format!("invalid response from server ({})", response.status))
        })?;

        if let Some(err) = body.errors.into_iter().next() {
            if err.is_auth_denied() {
                return Ok(Reply::AuthDenied(err));
            }
            return Err(ClientError::Api(err));
        }

        if !response.is_success() {
            return Err(ClientError::Unknown(format!("server error ({})", response.status)));
        }

        body.data
            .map(Reply::Data)
            .ok_or_else(|| ClientError::Unknown("response carried no data".into()))
    }
}

fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T, ClientError> {
    serde_json::from_value(data)
        .map_err(|e| ClientError::Unknown(format!("unexpected response shape: {e}")))
}
