//! Shared types and token primitives for Pocketbook authentication.
//!
//! This crate provides:
//! - JWT claims structures (`TokenClaims`, `UnverifiedClaims`) and `TokenPair`
//! - The GraphQL request/response envelope and auth payloads
//! - Wire error codes
//! - Signature verification (`verify_jwt`) and the unverified claims decoder
//!   (`decode_unverified`), deliberately kept apart

mod claims;
mod crypto;
mod errors;
mod responses;

pub use claims::{TokenClaims, TokenPair, UnverifiedClaims};
pub use crypto::{decode_unverified, verify_jwt};
pub use errors::{ErrorCode, JwtError, is_auth_denied_code};
pub use responses::{
    AuthPayload, ErrorExtensions, GraphQLError, GraphQLRequest, GraphQLResponse, UserModel,
};
