//! Error types for the Landscape core.

/// Core error type for endpoint and configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The endpoint URI could not be decomposed into scheme, host and path.
    #[error("invalid endpoint {uri:?}: {reason}")]
    InvalidEndpoint {
        /// The endpoint as supplied.
        uri: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A required configuration value is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
