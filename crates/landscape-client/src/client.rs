//! The signed-call pipeline: canonicalize, sign, send, decode.

use std::sync::Arc;

use chrono::Utc;
use landscape_auth::{ParameterSet, sign_request};
use landscape_core::{Credentials, Endpoint, LandscapeConfig};
use serde_json::Value;
use tracing::debug;

use crate::decode::decode_response;
use crate::error::ClientResult;
use crate::transport::{HttpTransport, Transport};

/// Run one signed API call.
///
/// Builds a fresh timestamp, canonical query and signature, sends them through
/// `transport`, and parses the reply as JSON. Nothing is cached between calls
/// and nothing is retried.
///
/// # Errors
///
/// - [`ClientError::Parameters`](crate::ClientError::Parameters) if a
///   parameter name is reserved or collides after flattening.
/// - [`ClientError::Transport`](crate::ClientError::Transport) on network failure.
/// - [`ClientError::Decode`](crate::ClientError::Decode) if the body is not JSON.
pub async fn call(
    transport: &dyn Transport,
    endpoint: &Endpoint,
    credentials: &Credentials,
    action: &str,
    params: &ParameterSet,
) -> ClientResult<Value> {
    let signed = sign_request(endpoint, credentials, action, params, Utc::now())?;

    let response = transport.post_form(endpoint, signed.into_body()).await?;
    debug!(action, status = response.status, "Landscape call completed");

    decode_response(response.body)
}

/// A Landscape API client bound to one endpoint and credential pair.
///
/// Cloning is cheap and clones share the transport's connection pool. The
/// client holds no mutable state, so concurrent calls are independent.
///
/// # Examples
///
/// ```no_run
/// use landscape_auth::ParameterSet;
/// use landscape_client::LandscapeClient;
/// use landscape_core::LandscapeConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LandscapeConfig::from_env()?;
/// let client = LandscapeClient::new(&config)?;
/// let computers = client
///     .call("GetComputers", &ParameterSet::new().with("query", "needs:reboot"))
///     .await?;
/// println!("{computers}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LandscapeClient {
    endpoint: Endpoint,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl LandscapeClient {
    /// Create a client over HTTP(S) from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`](crate::ClientError::Transport) if the
    /// HTTP client cannot be built.
    pub fn new(config: &LandscapeConfig) -> ClientResult<Self> {
        Ok(Self::with_transport(
            config.endpoint.clone(),
            config.credentials.clone(),
            Arc::new(HttpTransport::new()?),
        ))
    }

    /// Create a client over HTTP(S) from an endpoint URI and credentials,
    /// without going through the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`](crate::ClientError::Configuration)
    /// if `uri` is not a usable endpoint, and
    /// [`ClientError::Transport`](crate::ClientError::Transport) if the HTTP
    /// client cannot be built.
    pub fn from_uri(uri: &str, credentials: Credentials) -> ClientResult<Self> {
        let endpoint = Endpoint::parse(uri)?;
        Ok(Self::with_transport(
            endpoint,
            credentials,
            Arc::new(HttpTransport::new()?),
        ))
    }

    /// Create a client over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(
        endpoint: Endpoint,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            endpoint,
            credentials,
            transport,
        }
    }

    /// The endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Run one signed API call. See [`call`].
    ///
    /// # Errors
    ///
    /// Same as [`call`].
    pub async fn call(&self, action: &str, params: &ParameterSet) -> ClientResult<Value> {
        call(
            self.transport.as_ref(),
            &self.endpoint,
            &self.credentials,
            action,
            params,
        )
        .await
    }
}
