//! Landscape API request canonicalization and signing.
//!
//! Every Landscape API call is authenticated by an HMAC-SHA256 signature over
//! a canonical form of the request. This crate builds that canonical form and
//! the signature; it does no I/O.
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use landscape_auth::{ParameterSet, sign_request};
//! use landscape_core::{Credentials, Endpoint};
//!
//! let endpoint = Endpoint::parse("https://landscape.canonical.com/api/").unwrap();
//! let creds = Credentials::new("AKID", "secret");
//! let params = ParameterSet::new().with("query", "needs:reboot");
//!
//! let signed = sign_request(&endpoint, &creds, "GetComputers", &params, Utc::now()).unwrap();
//! assert!(signed.body().contains("&signature="));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Sorting, flattening and percent-encoding of parameters
//! - [`error`] - Canonicalization error types
//! - [`params`] - Parameter set types
//! - [`signer`] - String-to-sign construction and HMAC-SHA256 signature

pub mod canonical;
pub mod error;
pub mod params;
pub mod signer;

pub use canonical::{CanonicalQuery, build_canonical_query, percent_encode};
pub use error::AuthError;
pub use params::{ParamValue, ParameterSet};
pub use signer::{SignedRequest, build_string_to_sign, compute_signature, sign_request};
