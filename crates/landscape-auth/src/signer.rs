//! HMAC-SHA256 request signing.
//!
//! The string to sign is:
//!
//! ```text
//! POST\n
//! <host>\n
//! <path>\n
//! <canonical query>
//! ```
//!
//! and `signature = Base64(HMAC-SHA256(SecretKey, StringToSign))`. The path is
//! written verbatim, so an endpoint without a path contributes an empty line.
//! The signature is appended as the last pair of the transmitted body; it is
//! never sorted into the canonical query.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use landscape_core::{Credentials, Endpoint};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{CanonicalQuery, build_canonical_query, percent_encode};
use crate::error::AuthError;
use crate::params::ParameterSet;

type HmacSha256 = Hmac<Sha256>;

/// The only HTTP method the API accepts.
pub const HTTP_METHOD: &str = "POST";

/// A canonical query together with its signature, ready to send.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    canonical: CanonicalQuery,
    signature: String,
    body: String,
}

impl SignedRequest {
    /// The canonical query the signature covers.
    #[must_use]
    pub fn canonical_query(&self) -> &CanonicalQuery {
        &self.canonical
    }

    /// The base64 signature (not percent-encoded).
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The form-encoded body: canonical query followed by `&signature=...`.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the request, returning the form-encoded body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Build the string to sign for a canonical query.
///
/// # Examples
///
/// ```
/// use landscape_auth::signer::build_string_to_sign;
///
/// assert_eq!(
///     build_string_to_sign("example.com", "/api/", "a=1"),
///     "POST\nexample.com\n/api/\na=1"
/// );
/// assert_eq!(build_string_to_sign("example.com", "", "a=1"), "POST\nexample.com\n\na=1");
/// ```
#[must_use]
pub fn build_string_to_sign(host: &str, path: &str, canonical_query: &str) -> String {
    format!("{HTTP_METHOD}\n{host}\n{path}\n{canonical_query}")
}

/// Compute the signature: Base64(HMAC-SHA256(secret, string_to_sign)).
#[must_use]
pub fn compute_signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    let result = mac.finalize().into_bytes();
    BASE64.encode(result)
}

/// Canonicalize and sign one API call.
///
/// A fresh [`SignedRequest`] is built per call; with a new `timestamp` each
/// time, identical logical calls carry different signatures.
///
/// # Errors
///
/// Propagates [`AuthError`] from canonicalization.
pub fn sign_request(
    endpoint: &Endpoint,
    credentials: &Credentials,
    action: &str,
    params: &ParameterSet,
    timestamp: DateTime<Utc>,
) -> Result<SignedRequest, AuthError> {
    let canonical =
        build_canonical_query(action, credentials.access_key_id(), params, timestamp)?;

    let string_to_sign = build_string_to_sign(endpoint.host(), endpoint.path(), canonical.as_str());
    debug!(action, string_to_sign = ?string_to_sign, "Built string to sign");

    let signature = compute_signature(credentials.secret_key(), &string_to_sign);

    let body = format!("{canonical}&signature={}", percent_encode(&signature));

    Ok(SignedRequest {
        canonical,
        signature,
        body,
    })
}
