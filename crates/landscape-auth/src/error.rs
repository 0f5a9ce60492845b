//! Error types for request canonicalization.
//!
//! All canonicalization failures are input faults raised before anything is
//! signed or sent, so the request never leaves the process.

/// Errors that can occur while building a canonical query.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A caller parameter collides with a protocol-reserved field, or two
    /// parameters flatten to the same key.
    #[error("Duplicate parameter: {0}")]
    DuplicateParameter(String),

    /// A parameter value is neither a string nor a sequence of strings.
    #[error("Invalid type for parameter {name}: expected string or array of strings, found {found}")]
    InvalidParameterType {
        /// The offending parameter name.
        name: String,
        /// The JSON type that was supplied.
        found: &'static str,
    },
}
