//! Canonical query construction for Landscape API requests.
//!
//! The canonical query is built as follows:
//!
//! 1. The caller's parameters are merged with the protocol fields (`action`,
//!    `access_key_id`, `signature_method`, `signature_version`, `timestamp`,
//!    `version`).
//! 2. Keys are sorted byte-wise, ascending, on the unflattened name.
//! 3. List values are flattened into `name.1`, `name.2`, ... in list order.
//! 4. Every key and value is percent-encoded, leaving only `A-Z a-z 0-9 - _ . ~`.
//! 5. Pairs are joined as `key=value` separated by `&`.
//!
//! The result is both the signed payload suffix and the transmitted body, so it
//! must be byte-for-byte reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::AuthError;
use crate::params::{ParamValue, ParameterSet};

/// Value of the `signature_method` field.
pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// Value of the `signature_version` field.
pub const SIGNATURE_VERSION: &str = "2";

/// Value of the `version` field.
pub const API_VERSION: &str = "2011-08-01";

/// Parameter names owned by the signing protocol. `signature` is appended
/// after signing and is reserved as well.
pub const RESERVED_PARAMS: &[&str] = &[
    "access_key_id",
    "action",
    "signature",
    "signature_method",
    "signature_version",
    "timestamp",
    "version",
];

/// The set of bytes that must be percent-encoded in keys and values.
///
/// Everything except the RFC 3986 unreserved characters (A-Z, a-z, 0-9, `-`,
/// `_`, `.`, `~`) is encoded. Unlike a browser `encodeURIComponent`, this
/// also encodes `!`, `'`, `(`, `)` and `*`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a key or value using the strict unreserved set.
///
/// Hex digits are uppercase.
///
/// # Examples
///
/// ```
/// use landscape_auth::canonical::percent_encode;
///
/// assert_eq!(percent_encode("a!b'c"), "a%21b%27c");
/// assert_eq!(percent_encode("needs:reboot"), "needs%3Areboot");
/// assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET).to_string()
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SSZ` with fractional seconds dropped.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use landscape_auth::canonical::format_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2026, 10, 16, 9, 5, 3).unwrap();
/// assert_eq!(format_timestamp(ts), "2026-10-16T09:05:03Z");
/// ```
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// A sorted, flattened, percent-encoded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalQuery {
    pairs: Vec<(String, String)>,
    query: String,
}

impl CanonicalQuery {
    /// The encoded `(key, value)` pairs in emission order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The joined `key=value&...` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Consume the query, returning the joined string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.query
    }
}

impl fmt::Display for CanonicalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// Build the canonical query for one request.
///
/// `timestamp` is the wall-clock time embedded in the request; callers pass
/// `Utc::now()` except in tests.
///
/// # Errors
///
/// Returns [`AuthError::DuplicateParameter`] if a caller parameter uses a
/// reserved protocol name, or if two parameters flatten to the same key
/// (for example a list `ids` alongside a scalar `ids.1`).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use landscape_auth::canonical::build_canonical_query;
/// use landscape_auth::params::ParameterSet;
///
/// let params = ParameterSet::new().with("computer_ids", ["7", "9"].as_slice());
/// let ts = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
/// let query = build_canonical_query("RebootComputers", "AKID", &params, ts).unwrap();
///
/// assert_eq!(
///     query.as_str(),
///     "access_key_id=AKID&action=RebootComputers&computer_ids.1=7&computer_ids.2=9\
///      &signature_method=HmacSHA256&signature_version=2\
///      &timestamp=2026-10-16T12%3A00%3A00Z&version=2011-08-01"
/// );
/// ```
pub fn build_canonical_query(
    action: &str,
    access_key_id: &str,
    params: &ParameterSet,
    timestamp: DateTime<Utc>,
) -> Result<CanonicalQuery, AuthError> {
    if let Some(name) = RESERVED_PARAMS.iter().find(|name| params.contains(name)) {
        return Err(AuthError::DuplicateParameter((*name).to_owned()));
    }

    let timestamp = format_timestamp(timestamp);
    let protocol = [
        ("access_key_id", access_key_id),
        ("action", action),
        ("signature_method", SIGNATURE_METHOD),
        ("signature_version", SIGNATURE_VERSION),
        ("timestamp", timestamp.as_str()),
        ("version", API_VERSION),
    ];

    // Merge into one ordered view. Sorting happens on the unflattened names.
    let mut merged: BTreeMap<&str, Flat<'_>> = BTreeMap::new();
    for (name, value) in params.iter() {
        merged.insert(name, Flat::Param(value));
    }
    for (name, value) in protocol {
        merged.insert(name, Flat::Protocol(value));
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut pairs = Vec::with_capacity(merged.len());

    for (name, value) in merged {
        match value {
            Flat::Protocol(v) => push_pair(&mut pairs, &mut seen, name.to_owned(), v)?,
            Flat::Param(ParamValue::Single(v)) => {
                push_pair(&mut pairs, &mut seen, name.to_owned(), v)?;
            }
            Flat::Param(ParamValue::List(values)) => {
                for (idx, v) in values.iter().enumerate() {
                    push_pair(&mut pairs, &mut seen, format!("{name}.{}", idx + 1), v)?;
                }
            }
        }
    }

    let query = join_pairs(&pairs);

    Ok(CanonicalQuery { pairs, query })
}

/// Join encoded pairs as `k=v&k=v`.
fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// A merged parameter before flattening.
enum Flat<'a> {
    Protocol(&'a str),
    Param(&'a ParamValue),
}

fn push_pair(
    pairs: &mut Vec<(String, String)>,
    seen: &mut BTreeSet<String>,
    key: String,
    value: &str,
) -> Result<(), AuthError> {
    if !seen.insert(key.clone()) {
        return Err(AuthError::DuplicateParameter(key));
    }
    pairs.push((percent_encode(&key), percent_encode(value)));
    Ok(())
}
