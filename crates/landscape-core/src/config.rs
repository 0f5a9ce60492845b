//! Process configuration for the Landscape API client.
//!
//! Configuration is driven by environment variables, read once at startup.
//! The signing and transport crates never look at the environment themselves;
//! they receive the resolved [`LandscapeConfig`] by reference.

use crate::endpoint::Endpoint;
use crate::error::{CoreError, CoreResult};
use crate::types::Credentials;

/// Environment variable holding the endpoint URI.
const ENV_API_URI: &str = "LANDSCAPE_API_URI";
/// Environment variable holding the access key id.
const ENV_API_KEY: &str = "LANDSCAPE_API_KEY";
/// Environment variable holding the secret key.
const ENV_API_SECRET: &str = "LANDSCAPE_API_SECRET";
/// Environment variable holding the log filter.
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Default log filter when neither `RUST_LOG` nor `LOG_LEVEL` is set.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct LandscapeConfig {
    /// The API endpoint.
    pub endpoint: Endpoint,
    /// The access key pair.
    pub credentials: Credentials,
    /// Log level filter string (e.g. `"info"`, `"debug"`).
    pub log_level: String,
}

impl LandscapeConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LANDSCAPE_API_URI` | *(required)* |
    /// | `LANDSCAPE_API_KEY` | *(required)* |
    /// | `LANDSCAPE_API_SECRET` | *(required)* |
    /// | `LOG_LEVEL` | `warn` |
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] if a required variable is missing or empty, or
    /// if the endpoint URI is malformed.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`LandscapeConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CoreError::Configuration(format!("{name} is not set")))
        };

        let endpoint = Endpoint::parse(&required(ENV_API_URI)?)?;
        let credentials = Credentials::new(required(ENV_API_KEY)?, required(ENV_API_SECRET)?);
        let log_level = lookup(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());

        tracing::debug!(endpoint = %endpoint, "loaded landscape configuration");

        Ok(Self {
            endpoint,
            credentials,
            log_level,
        })
    }
}
