//! Single-flight token refresh.
//!
//! At most one refresh call is outstanding per coordinator. Callers that
//! arrive while it is in flight await the same attempt and observe the same
//! outcome. The attempt runs on its own task, so it settles and clears the
//! pending slot even if every caller stops waiting.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use pocketbook_types::{GraphQLResponse, TokenPair};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;
use crate::operations;
use crate::session::SessionStore;
use crate::transport::Transport;

type RefreshAttempt = Shared<BoxFuture<'static, Result<String, ClientError>>>;

#[derive(Deserialize)]
struct RefreshData {
    #[serde(rename = "refreshToken")]
    refresh_token: Option<TokenPair>,
}

/// Exchanges the stored refresh token for a new pair.
///
/// Cloning yields a handle to the same coordinator and the same pending slot.
/// Each attempt is spawned onto the ambient Tokio runtime, so
/// [`RefreshCoordinator::refresh`] must be polled from within one.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    session: SessionStore,
    transport: Arc<dyn Transport>,
    pending: Mutex<Option<RefreshAttempt>>,
}

impl RefreshCoordinator {
    pub fn new(session: SessionStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                session,
                transport,
                pending: Mutex::new(None),
            }),
        }
    }

    /// Whether a refresh attempt is currently in flight.
    pub fn is_in_progress(&self) -> bool {
        self.inner.pending().is_some()
    }

    /// Returns a new access token, joining the in-flight attempt if there is one.
    ///
    /// On any failure, a panicking transport included, the session has been
    /// cleared by the time this returns.
    pub async fn refresh(&self) -> Result<String, ClientError> {
        self.join_or_start().await
    }

    fn join_or_start(&self) -> RefreshAttempt {
        let mut pending = self.inner.pending();
        if let Some(attempt) = pending.as_ref() {
            debug!("joining in-flight token refresh");
            return attempt.clone();
        }

        debug!("starting token refresh");
        let inner = Arc::clone(&self.inner);
        // The slot lock is held until the attempt is stored, so the task
        // cannot clear the slot before it has been filled.
        let task = tokio::spawn(async move {
            let _settle = ClearOnSettle(Arc::clone(&inner));
            match AssertUnwindSafe(inner.exchange()).catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    error!("token refresh panicked, clearing session");
                    inner.clear_session().await;
                    Err(ClientError::RefreshFailed("refresh task panicked".into()))
                }
            }
        });

        let attempt = task
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(ClientError::RefreshFailed(format!("refresh task aborted: {e}")))
                })
            })
            .boxed()
            .shared();
        *pending = Some(attempt.clone());
        attempt
    }
}

/// Empties the pending slot when the refresh task ends, however it ends.
struct ClearOnSettle(Arc<Inner>);

impl Drop for ClearOnSettle {
    fn drop(&mut self) {
        self.0.pending().take();
    }
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, Option<RefreshAttempt>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn exchange(&self) -> Result<String, ClientError> {
        let result = self.try_exchange().await;

        if let Err(e) = &result {
            warn!(error = %e, "token refresh failed, clearing session");
            self.clear_session().await;
        }

        result
    }

    async fn clear_session(&self) {
        if let Err(e) = self.session.clear().await {
            error!(error = %e, "failed to clear session after refresh failure");
        }
    }

    async fn try_exchange(&self) -> Result<String, ClientError> {
        let Some(refresh_token) = self.session.refresh_token().await? else {
            return Err(ClientError::NoRefreshToken);
        };

        let request = operations::refresh_token(&refresh_token);
        let response = self
            .transport
            .send(&request, None)
            .await
            .map_err(|e| ClientError::RefreshFailed(e.to_string()))?;

        let body: GraphQLResponse<RefreshData> = serde_json::from_slice(&response.body)
            .map_err(|_| {
                ClientError::RefreshFailed(format!(
                    "invalid refresh response ({})",
                    response.status
                ))
            })?;

        if let Some(err) = body.errors.into_iter().next() {
            return Err(ClientError::RefreshRejected(err.message));
        }

        let pair = body
            .data
            .and_then(|data| data.refresh_token)
            .filter(|pair| !pair.access_token.is_empty() && !pair.refresh_token.is_empty())
            .ok_or_else(|| ClientError::RefreshFailed("refresh response carried no tokens".into()))?;

        self.session.set(&pair).await?;
        info!("token pair rotated");

        Ok(pair.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::test_utils::{MockTransport, auth_denied, graphql_data, token_expiring_in};
    use crate::error::TransportError;
    use futures_util::future::join_all;
    use serde_json::json;
    use std::time::Duration;

    fn setup(transport: MockTransport) -> (RefreshCoordinator, SessionStore, Arc<MockTransport>) {
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));
        let transport = Arc::new(transport);
        let coordinator = RefreshCoordinator::new(session.clone(), transport.clone());
        (coordinator, session, transport)
    }

    fn rotating_to(pair: TokenPair) -> MockTransport {
        MockTransport::new(move |_, _| {
            graphql_data(json!({ "refreshToken": { "token": pair.access_token, "refreshToken": pair.refresh_token } }))
        })
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_share_one_call() {
        let new_pair = TokenPair::new(token_expiring_in(900), "R2");
        let (coordinator, session, transport) =
            setup(rotating_to(new_pair.clone()).with_delay(Duration::from_millis(20)));
        session.set(&TokenPair::new(token_expiring_in(-10), "R1")).await.unwrap();

        for k in [1usize, 2, 8, 32] {
            let before = transport.calls_to("RefreshToken");
            let results = join_all((0..k).map(|_| coordinator.refresh())).await;

            assert_eq!(transport.calls_to("RefreshToken") - before, 1);
            assert_eq!(results.len(), k);
            for result in results {
                assert_eq!(result.unwrap(), new_pair.access_token);
            }
            assert!(!coordinator.is_in_progress());
        }
    }

    #[tokio::test]
    async fn test_rotation_replaces_stored_pair() {
        let new_pair = TokenPair::new(token_expiring_in(900), "R2");
        let (coordinator, session, transport) = setup(rotating_to(new_pair.clone()));
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        coordinator.refresh().await.unwrap();

        assert_eq!(session.get().await.unwrap(), Some(new_pair));
        let sent = transport.variables_for("RefreshToken");
        assert_eq!(sent[0], json!({ "input": { "refreshToken": "R1" } }));
        assert_eq!(transport.bearers_for("RefreshToken"), vec![None]);
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_network() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_items(&[("token", "A1")]).await.unwrap();
        let session = SessionStore::new(storage.clone());
        let transport = Arc::new(rotating_to(TokenPair::new("A2", "R2")));
        let coordinator = RefreshCoordinator::new(session, transport.clone());

        let result = coordinator.refresh().await;

        assert!(matches!(result, Err(ClientError::NoRefreshToken)));
        assert_eq!(transport.total_calls(), 0);
        assert!(storage.get_item("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejection_clears_session() {
        let (coordinator, session, _transport) = setup(MockTransport::new(|_, _| {
            auth_denied("Invalid or expired refresh token")
        }));
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        let result = coordinator.refresh().await;

        match result {
            Err(ClientError::RefreshRejected(message)) => {
                assert_eq!(message, "Invalid or expired refresh token")
            }
            other => panic!("expected RefreshRejected, got {other:?}"),
        }
        assert!(session.access_token().await.unwrap().is_none());
        assert!(session.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_clears_session() {
        let (coordinator, session, _transport) = setup(MockTransport::new(|_, _| {
            Err(TransportError("connection refused".into()))
        }));
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        let result = coordinator.refresh().await;

        assert!(matches!(result, Err(ClientError::RefreshFailed(_))));
        assert!(session.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_is_refresh_failure() {
        let (coordinator, session, _transport) =
            setup(MockTransport::new(|_, _| graphql_data(json!({ "refreshToken": { "token": "A2" } }))));
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        let result = coordinator.refresh().await;

        assert!(matches!(result, Err(ClientError::RefreshFailed(_))));
        assert!(session.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_waiters_all_observe_failure() {
        let (coordinator, session, transport) = setup(
            MockTransport::new(|_, _| auth_denied("expired")).with_delay(Duration::from_millis(20)),
        );
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        let results = join_all((0..5).map(|_| coordinator.refresh())).await;

        assert_eq!(transport.calls_to("RefreshToken"), 1);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(ClientError::RefreshRejected(_)))));
    }

    #[tokio::test]
    async fn test_slot_resets_after_settling() {
        let (coordinator, session, transport) =
            setup(MockTransport::new(|_, _| Err(TransportError("offline".into()))));
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        assert!(coordinator.refresh().await.is_err());
        assert!(!coordinator.is_in_progress());

        session.set(&TokenPair::new("A1", "R1")).await.unwrap();
        assert!(coordinator.refresh().await.is_err());
        assert_eq!(transport.calls_to("RefreshToken"), 2);
    }

    #[tokio::test]
    async fn test_panicking_transport_clears_session() {
        let (coordinator, session, transport) = setup(MockTransport::new(|_, _| {
            panic!("transport handler blew up")
        }));
        session.set(&TokenPair::new("A1", "R1")).await.unwrap();

        let results = join_all((0..3).map(|_| coordinator.refresh())).await;

        assert_eq!(transport.calls_to("RefreshToken"), 1);
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(ClientError::RefreshFailed(_)))));
        assert!(session.get().await.unwrap().is_none());
        assert!(!coordinator.is_in_progress());
    }
}
