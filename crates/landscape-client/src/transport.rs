//! HTTP transport for signed requests.
//!
//! A [`Transport`] delivers one form-encoded POST and returns the complete
//! response body. [`HttpTransport`] is the production implementation; tests and
//! embedders can supply their own.
//!
//! # Object safety
//!
//! The client holds its transport as `Arc<dyn Transport>`, so the trait uses
//! `#[async_trait]` to stay object-safe.

use std::fmt;

use async_trait::async_trait;
use landscape_core::Endpoint;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Content type of every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A fully collected HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// The response body, read to the end.
    pub body: String,
}

/// Delivers a single POST to an endpoint.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// POST `body` to `endpoint` as `application/x-www-form-urlencoded`.
    ///
    /// Resolves once, with either the complete response or an error. Non-2xx
    /// statuses are not errors at this layer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on connection, DNS, TLS or read
    /// failures.
    async fn post_form(&self, endpoint: &Endpoint, body: String)
    -> ClientResult<TransportResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
///
/// Plaintext or TLS is chosen from the endpoint's scheme.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ClientError::transport)?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client, for callers that tune timeouts or
    /// proxies themselves.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        endpoint: &Endpoint,
        body: String,
    ) -> ClientResult<TransportResponse> {
        let url = endpoint.url();
        let content_length = body.len();

        debug!(
            url = %url,
            tls = endpoint.scheme().is_tls(),
            content_length,
            "Sending signed request"
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::transport)?;

        debug!(status = %status, body_len = body.len(), "Received response");

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
