//! Error types for the Landscape client.

use landscape_auth::AuthError;
use landscape_core::CoreError;

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`call`](crate::call) and the [`LandscapeClient`](crate::LandscapeClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint or other configuration is unusable.
    #[error(transparent)]
    Configuration(#[from] CoreError),

    /// The parameters could not be canonicalized.
    #[error(transparent)]
    Parameters(#[from] AuthError),

    /// The request could not be delivered or the response could not be read.
    /// Never retried by the client.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response body is not JSON. The raw body is kept verbatim.
    #[error("response body is not valid JSON: {body:?}")]
    Decode {
        /// The response body as received.
        body: String,
        /// The JSON parser's complaint.
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Wrap any error as a transport failure.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// The raw response body, if this is a decode failure.
    #[must_use]
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Convenience result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
