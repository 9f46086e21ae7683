//! Pocketbook client implementation.

use std::sync::Arc;

use pocketbook_types::{AuthPayload, GraphQLRequest, UserModel};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;
use url::Url;

use crate::error::ClientError;
use crate::executor::RequestExecutor;
use crate::expiry::DecodeFailurePolicy;
use crate::operations;
use crate::refresh::RefreshCoordinator;
use crate::session::SessionStore;
use crate::storage::{KeyValueStorage, MemoryStorage};
use crate::transport::{HttpTransport, Transport};

const DEFAULT_LEEWAY_SECONDS: u64 = 15;

/// Configuration for the Pocketbook client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint (e.g., "https://api.example.com/graphql")
    pub endpoint: String,

    /// Refresh this many seconds before the access token expires (default: 15)
    pub leeway_seconds: Option<u64>,

    /// How to treat an access token whose expiry cannot be read
    pub decode_failure: DecodeFailurePolicy,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            leeway_seconds: None,
            decode_failure: DecodeFailurePolicy::default(),
        }
    }

    fn endpoint_url(&self) -> Result<Url, ClientError> {
        if self.endpoint.is_empty() {
            return Err(ClientError::Config("endpoint is required".into()));
        }
        Url::parse(&self.endpoint)
            .map_err(|e| ClientError::Config(format!("invalid endpoint: {e}")))
    }
}

#[derive(Deserialize)]
struct LoginData {
    login: AuthPayload,
}

#[derive(Deserialize)]
struct RegisterData {
    register: AuthPayload,
}

#[derive(Deserialize)]
struct MeData {
    me: UserModel,
}

/// Pocketbook client: session lifecycle plus authenticated calls.
///
/// Every authenticated call goes through one shared refresh coordinator, so
/// a burst of calls against an expired session triggers a single refresh.
pub struct PocketbookClient {
    session: SessionStore,
    coordinator: RefreshCoordinator,
    executor: RequestExecutor,
}

impl PocketbookClient {
    /// Create a client with an in-memory session.
    ///
    /// # Returns
    /// A configured `PocketbookClient` or an error if configuration is invalid.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    /// Create a client whose session lives in `storage`.
    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(config.endpoint_url()?));
        Ok(Self::with_transport(config, storage, transport))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let session = SessionStore::new(storage);
        let coordinator = RefreshCoordinator::new(session.clone(), transport.clone());
        let executor = RequestExecutor::new(
            session.clone(),
            coordinator.clone(),
            transport,
            config.leeway_seconds.unwrap_or(DEFAULT_LEEWAY_SECONDS),
            config.decode_failure,
        );

        Self {
            session,
            coordinator,
            executor,
        }
    }

    /// Log in and store the returned token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserModel, ClientError> {
        let data: LoginData = self
            .executor
            .execute_public(&operations::login(email, password))
            .await?;
        self.session.set(&data.login.token_pair()).await?;
        info!(user_id = %data.login.user.id, "logged in");
        Ok(data.login.user)
    }

    /// Create an account and store the returned token pair.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserModel, ClientError> {
        let data: RegisterData = self
            .executor
            .execute_public(&operations::register(name, email, password))
            .await?;
        self.session.set(&data.register.token_pair()).await?;
        info!(user_id = %data.register.user.id, "registered");
        Ok(data.register.user)
    }

    /// Forget the stored tokens. Nothing is sent to the API.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session.clear().await
    }

    /// The profile of the logged-in user.
    pub async fn me(&self) -> Result<UserModel, ClientError> {
        let data: MeData = self.executor.execute(&operations::me()).await?;
        Ok(data.me)
    }

    /// Run an authenticated operation and decode its `data`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphQLRequest,
    ) -> Result<T, ClientError> {
        self.executor.execute(request).await
    }

    /// Run a public operation and decode its `data`.
    pub async fn execute_public<T: DeserializeOwned>(
        &self,
        request: &GraphQLRequest,
    ) -> Result<T, ClientError> {
        self.executor.execute_public(request).await
    }

    /// Whether an access token is stored. Says nothing about its validity.
    pub async fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.session.access_token().await?.is_some())
    }

    /// Whether a token refresh is in flight.
    pub fn is_refresh_in_progress(&self) -> bool {
        self.coordinator.is_in_progress()
    }

    /// The session store this client reads and writes.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}
