use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{TokenPair, is_auth_denied_code};

/// A GraphQL operation as posted to `/graphql`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub variables: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }

    /// The operation to run: the explicit `operationName`, else the name
    /// declared in the document (`mutation RefreshToken(...) { ... }`).
    pub fn resolved_operation_name(&self) -> Option<&str> {
        if let Some(name) = self.operation_name.as_deref() {
            return Some(name);
        }

        let mut words = self
            .query
            .split(|c: char| c.is_whitespace() || c == '(' || c == '{')
            .filter(|w| !w.is_empty());
        match words.next()? {
            "query" | "mutation" | "subscription" => words.next(),
            _ => None,
        }
    }
}

/// Response envelope: `data` on success, `errors` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse<T = Value> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    /// `null` and a missing field both read as no errors.
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<GraphQLError>,
}

/// A single entry of a response's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    /// Numeric codes are kept as their decimal text; other shapes are dropped.
    #[serde(
        default,
        deserialize_with = "code_as_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<GraphQLError>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GraphQLError>>::deserialize(deserializer)?.unwrap_or_default())
}

fn code_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(code) => Some(code),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    })
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: Some(ErrorExtensions {
                code: Some(code.into()),
            }),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }

    pub fn is_auth_denied(&self) -> bool {
        self.code().is_some_and(is_auth_denied_code)
    }
}

/// Public user profile returned by `login`, `register` and `me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Result of `login` and `register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub token: String,
    pub refresh_token: String,
    pub user: UserModel,
}

impl AuthPayload {
    pub fn token_pair(&self) -> TokenPair {
        TokenPair::new(self.token.clone(), self.refresh_token.clone())
    }
}
