//! Rust SDK for Pocketbook session management.
//!
//! This SDK keeps a client logged in against the Pocketbook GraphQL API.
//!
//! # Features
//!
//! - **Session store** - The access/refresh token pair in durable storage, replaced as a unit
//! - **Proactive refresh** - Tokens expiring within a leeway window are renewed before use
//! - **Single-flight refresh** - Concurrent callers share one refresh call and its outcome
//! - **Bounded retry** - A request denied as unauthenticated is retried once after a refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use pocketbook_sdk::{ClientConfig, PocketbookClient};
//!
//! let client = PocketbookClient::new(ClientConfig::new("http://localhost:4000/graphql"))?;
//!
//! client.login("ana@example.com", "secret123").await?;
//! let me = client.me().await?;
//! println!("Logged in as {}", me.email);
//! ```

mod client;
mod error;
mod executor;
pub mod expiry;
pub mod operations;
mod refresh;
mod session;
mod storage;
mod transport;

#[cfg(test)]
mod test_utils;

pub use client::{ClientConfig, PocketbookClient};
pub use error::{ClientError, StorageError, TransportError};
pub use executor::RequestExecutor;
pub use expiry::{DecodeFailurePolicy, ExpiryStatus, is_expired};
pub use refresh::RefreshCoordinator;
pub use session::SessionStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use transport::{HttpTransport, RawResponse, Transport};

// Re-export shared types for convenience
pub use pocketbook_types::{
    AuthPayload, GraphQLError, GraphQLRequest, GraphQLResponse, TokenPair, UserModel,
};
