use std::sync::Arc;

use pocketbook_types::TokenPair;
use tracing::info;

use crate::error::ClientError;
use crate::storage::KeyValueStorage;

const TOKEN_KEY: &str = "token";
const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Holder of the current access/refresh token pair.
///
/// Both keys absent means logged out. Tokens are only ever written or
/// removed together.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The stored pair, if both halves are present.
    pub async fn get(&self) -> Result<Option<TokenPair>, ClientError> {
        let access = self.access_token().await?;
        let refresh = self.refresh_token().await?;
        Ok(access.zip(refresh).map(|(a, r)| TokenPair::new(a, r)))
    }

    pub async fn access_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.storage.get_item(TOKEN_KEY).await?)
    }

    pub async fn refresh_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.storage.get_item(REFRESH_TOKEN_KEY).await?)
    }

    /// Replaces both tokens at once.
    pub async fn set(&self, pair: &TokenPair) -> Result<(), ClientError> {
        self.storage
            .set_items(&[
                (TOKEN_KEY, pair.access_token.as_str()),
                (REFRESH_TOKEN_KEY, pair.refresh_token.as_str()),
            ])
            .await?;
        Ok(())
    }

    /// Removes both tokens.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.storage
            .remove_items(&[TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await?;
        info!("session cleared");
        Ok(())
    }
}
