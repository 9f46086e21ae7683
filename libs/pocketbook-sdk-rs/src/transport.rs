use async_trait::async_trait;
use pocketbook_types::GraphQLRequest;
use url::Url;

use crate::error::TransportError;

/// An HTTP response as received, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends GraphQL operations to the API.
///
/// `Err` means no response was obtained at all; any response, whatever
/// its status or body, is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &GraphQLRequest,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport posting to a GraphQL endpoint.
pub struct HttpTransport {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: Url, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &GraphQLRequest,
        bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http_client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/graphql-response+json")
            .json(request);

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}
