//! Credential types shared by the signer and the client.

use std::fmt;

/// An access key pair for the Landscape API.
///
/// The access key id is sent with every request; the secret key is only ever
/// used as the HMAC key and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_key: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(access_key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// The public access key id.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The private secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"...")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_expose_both_keys() {
        let creds = Credentials::new("AKID", "s3cr3t");
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_key(), "s3cr3t");
    }

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let rendered = format!("{:?}", Credentials::new("AKID", "s3cr3t"));
        assert!(rendered.contains("AKID"));
        assert!(!rendered.contains("s3cr3t"));
    }
}
