//! GraphQL documents used by the SDK itself.

use pocketbook_types::GraphQLRequest;
use serde_json::json;

pub const LOGIN: &str = "mutation Login($input: LoginInput!) {
  login(input: $input) { token refreshToken user { id name email createdAt updatedAt } }
}";

pub const REGISTER: &str = "mutation Register($input: RegisterInput!) {
  register(input: $input) { token refreshToken user { id name email createdAt updatedAt } }
}";

pub const REFRESH_TOKEN: &str = "mutation RefreshToken($input: RefreshTokenInput!) {
  refreshToken(input: $input) { token refreshToken }
}";

pub const ME: &str = "query Me { me { id name email createdAt updatedAt } }";

fn named(name: &str, query: &str, variables: serde_json::Value) -> GraphQLRequest {
    let mut request = GraphQLRequest::new(query, variables);
    request.operation_name = Some(name.to_string());
    request
}

pub fn login(email: &str, password: &str) -> GraphQLRequest {
    named(
        "Login",
        LOGIN,
        json!({ "input": { "email": email, "password": password } }),
    )
}

pub fn register(name: &str, email: &str, password: &str) -> GraphQLRequest {
    named(
        "Register",
        REGISTER,
        json!({ "input": { "name": name, "email": email, "password": password } }),
    )
}

/// The refresh token travels in the operation body, never in a header.
pub fn refresh_token(refresh_token: &str) -> GraphQLRequest {
    named(
        "RefreshToken",
        REFRESH_TOKEN,
        json!({ "input": { "refreshToken": refresh_token } }),
    )
}

pub fn me() -> GraphQLRequest {
    named("Me", ME, serde_json::Value::Null)
}
