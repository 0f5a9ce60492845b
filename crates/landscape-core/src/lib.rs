//! Endpoint, credential, and configuration types for the Landscape API client.
//!
//! This crate holds the plain data the signing and transport layers share:
//! the decomposed API [`Endpoint`], the [`Credentials`] pair used for
//! HMAC signing, and the process-level [`LandscapeConfig`]. Nothing here
//! performs I/O; the configuration is read from the environment once by the
//! binary and then passed down by reference.

mod config;
mod endpoint;
mod error;
mod types;

pub use config::LandscapeConfig;
pub use endpoint::{Endpoint, Scheme};
pub use error::{CoreError, CoreResult};
pub use types::Credentials;
