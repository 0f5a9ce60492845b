//! Response body decoding.

use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Parse a collected response body as JSON.
///
/// Any JSON document is accepted, whatever its shape. A body that does not
/// parse comes back as [`ClientError::Decode`] carrying the body unchanged,
/// since API error pages are not always JSON.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if `body` is not valid JSON.
pub fn decode_response(body: String) -> ClientResult<Value> {
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(source) => Err(ClientError::Decode { body, source }),
    }
}
