//! API endpoint decomposition.
//!
//! The signing payload needs the endpoint's host and path exactly as the
//! server will reconstruct them, so an [`Endpoint`] is parsed once up front
//! and then reused for every call.

use std::fmt;
use std::str::FromStr;

use http::uri::Authority;

use crate::error::{CoreError, CoreResult};

/// Transport scheme of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plaintext HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// The scheme as it appears in a URI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Whether requests to this scheme are encrypted.
    #[must_use]
    pub fn is_tls(self) -> bool {
        matches!(self, Self::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Landscape API endpoint split into `scheme`, `host` and `path`.
///
/// The host is lower-cased and keeps an explicit port if one was given. The
/// path is kept verbatim, so an endpoint without a path has an empty path
/// rather than `/`. Only paths that an HTTP client sends unchanged are
/// accepted: printable ASCII path characters, well-formed `%XX` escapes, and
/// no `.` or `..` segments.
///
/// # Examples
///
/// ```
/// use landscape_core::{Endpoint, Scheme};
///
/// let endpoint = Endpoint::parse("https://Landscape.Canonical.com/api/").unwrap();
/// assert_eq!(endpoint.scheme(), Scheme::Https);
/// assert_eq!(endpoint.host(), "landscape.canonical.com");
/// assert_eq!(endpoint.path(), "/api/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    path: String,
}

impl Endpoint {
    /// Parse a `scheme://host[:port][/path]` URI.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEndpoint`] if the scheme is not `http` or
    /// `https`, the host is missing or malformed, the URI carries user
    /// info, a query string, or a fragment, or the path would be rewritten on
    /// the wire.
    pub fn parse(uri: &str) -> CoreResult<Self> {
        let invalid = |reason| CoreError::InvalidEndpoint {
            uri: uri.to_owned(),
            reason,
        };

        let (scheme, rest) = uri
            .trim()
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme"))?;

        let scheme = if scheme.eq_ignore_ascii_case("https") {
            Scheme::Https
        } else if scheme.eq_ignore_ascii_case("http") {
            Scheme::Http
        } else {
            return Err(invalid("scheme must be http or https"));
        };

        if rest.contains(['?', '#']) {
            return Err(invalid("query strings and fragments are not allowed"));
        }

        let (authority, path) = rest.find('/').map_or((rest, ""), |idx| rest.split_at(idx));

        if authority.is_empty() {
            return Err(invalid("missing host"));
        }
        if authority.contains('@') {
            return Err(invalid("user info is not allowed"));
        }

        let authority = Authority::from_str(authority).map_err(|_| invalid("malformed host"))?;
        if authority.host().is_empty() {
            return Err(invalid("missing host"));
        }

        validate_path(path).map_err(invalid)?;

        let host = match authority.port_u16() {
            Some(port) => format!("{}:{port}", authority.host().to_ascii_lowercase()),
            None => authority.host().to_ascii_lowercase(),
        };

        Ok(Self {
            scheme,
            host,
            path: path.to_owned(),
        })
    }

    /// The endpoint scheme.
    #[must_use]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The lower-cased host, including `:port` when one was given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The path component, possibly empty.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request target URL: `scheme://host/path`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// Check that `path` reaches the server byte for byte, since it is signed
/// verbatim.
fn validate_path(path: &str) -> Result<(), &'static str> {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes.get(i + 1..i + 3).ok_or("truncated percent escape")?;
                if !escape.iter().all(u8::is_ascii_hexdigit) {
                    return Err("malformed percent escape");
                }
                i += 3;
                continue;
            }
            b if b.is_ascii_alphanumeric() || PATH_SAFE.contains(&b) => {}
            _ => return Err("path contains characters that need escaping"),
        }
        i += 1;
    }

    let dot_segment = path.split('/').any(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment == "." || segment == ".."
    });
    if dot_segment {
        return Err("path contains dot segments");
    }

    Ok(())
}

/// Path bytes besides alphanumerics and `%` that are sent unescaped.
const PATH_SAFE: &[u8] = b"-._~!$&'()*+,;=:@/";

impl FromStr for Endpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}
