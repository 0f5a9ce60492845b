//! Signed-query HTTP client for the Landscape management API.
//!
//! A call runs four steps:
//!
//! 1. Canonicalize the action and parameters ([`landscape_auth::canonical`]).
//! 2. Sign the canonical query with HMAC-SHA256 ([`landscape_auth::signer`]).
//! 3. POST the signed, form-encoded query ([`transport`]).
//! 4. Parse the response body as JSON ([`decode`]).
//!
//! Each call suspends only on network I/O and resolves exactly once. There is
//! no retry, timeout or pagination; wrap calls in `tokio::time::timeout` if a
//! deadline is needed.

pub mod actions;
pub mod client;
pub mod decode;
pub mod error;
pub mod transport;

pub use client::{LandscapeClient, call};
pub use decode::decode_response;
pub use error::{BoxError, ClientError, ClientResult};
pub use transport::{FORM_CONTENT_TYPE, HttpTransport, Transport, TransportResponse};
