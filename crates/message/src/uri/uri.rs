use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;
use triomphe::Arc;

use super::encode::{filter_path, filter_query_or_fragment};
use super::parser;
use crate::ensure;
use crate::error::{InvalidArgument, ParseError};
use crate::matches::{HOST, SCHEME};

/// Schemes with a well-known default port, which is never stored explicitly.
const DEFAULT_PORTS: [(&str, u16); 2] = [("http", 80), ("https", 443)];

/// An immutable, normalized RFC 3986 URI.
///
/// `Uri` is a cheap handle over shared components. Every `with_*` operation leaves
/// the receiver untouched and returns either a new value with exactly one
/// component replaced, or, when the normalized argument equals the current
/// component, a handle to the very same instance (see [`Uri::ptr_eq`]).
///
/// Normalization applied on construction:
/// - scheme and host are lowercased
/// - a port equal to the scheme's default (80 for `http`, 443 for `https`) is dropped
/// - path, query and fragment are percent-encoded, existing `%XX` triplets are kept
///
/// # Example
///
/// ```
/// use micro_message::uri::Uri;
///
/// let uri = Uri::parse("HTTP://Example.COM:80/a b?q=1").unwrap();
/// assert_eq!(uri.host(), "example.com");
/// assert_eq!(uri.port(), None);
/// assert_eq!(uri.to_string(), "http://example.com/a%20b?q=1");
/// ```
#[derive(Clone)]
pub struct Uri {
    inner: Arc<Inner>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
struct Inner {
    scheme: String,
    user_info: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
}

/// Owned URI components, for building a [`Uri`] field by field.
///
/// Values are normalized and validated by [`Uri::from_parts`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UriParts {
    pub scheme: String,
    pub user_info: String,
    pub host: String,
    pub port: Option<u32>,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl Uri {
    /// Parses and normalizes a URI reference. The empty string yields the empty URI.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when `input` cannot be decomposed under the RFC 3986
    /// generic syntax, for example a non-numeric port or an `http` URI whose
    /// authority has no host.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Ok(Self::default());
        }

        let raw = parser::parse(input).inspect_err(|e| debug!(uri = input, cause = %e, "failed to parse uri"))?;

        let scheme = raw.scheme.map(str::to_ascii_lowercase).unwrap_or_default();
        let port = raw.port.and_then(|port| filter_port(&scheme, port));
        let inner = Inner {
            user_info: raw.user_info.unwrap_or_default().to_string(),
            host: raw.host.map(str::to_ascii_lowercase).unwrap_or_default(),
            port,
            path: filter_path(raw.path),
            query: raw.query.map(filter_query_or_fragment).unwrap_or_default(),
            fragment: raw.fragment.map(filter_query_or_fragment).unwrap_or_default(),
            scheme,
        };

        Ok(Self { inner: Arc::new(inner) })
    }

    /// Builds a URI from explicit components, applying the same normalization as [`Uri::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] for a malformed scheme or host, or a port above 65535.
    pub fn from_parts(parts: UriParts) -> Result<Self, InvalidArgument> {
        let scheme = normalize_scheme(&parts.scheme)?;
        let host = normalize_host(&parts.host)?;
        let port = match parts.port {
            Some(port) => filter_port(&scheme, checked_port(port)?),
            None => None,
        };

        let inner = Inner {
            scheme,
            user_info: parts.user_info,
            host,
            port,
            path: filter_path(&parts.path),
            query: filter_query_or_fragment(&parts.query),
            fragment: filter_query_or_fragment(&parts.fragment),
        };
        Ok(Self { inner: Arc::new(inner) })
    }

    /// Consumes the URI and returns its normalized components.
    pub fn into_parts(self) -> UriParts {
        let inner = Inner::clone(&self.inner);
        UriParts {
            scheme: inner.scheme,
            user_info: inner.user_info,
            host: inner.host,
            port: inner.port.map(u32::from),
            path: inner.path,
            query: inner.query,
            fragment: inner.fragment,
        }
    }

    /// Returns `true` when both handles point to the same instance.
    ///
    /// A no-op `with_*` call returns a handle for which this holds.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    /// Lowercase scheme, empty when absent.
    #[inline]
    pub fn scheme(&self) -> &str {
        &self.inner.scheme
    }

    #[inline]
    pub fn user_info(&self) -> &str {
        &self.inner.user_info
    }

    /// Lowercase host, empty when absent.
    #[inline]
    pub fn host(&self) -> &str {
        &self.inner.host
    }

    /// The explicit port, `None` when absent or equal to the scheme's default.
    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.inner.port
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    #[inline]
    pub fn query(&self) -> &str {
        &self.inner.query
    }

    #[inline]
    pub fn fragment(&self) -> &str {
        &self.inner.fragment
    }

    /// Returns `[userinfo@]host[:port]`, or the empty string when there is no host.
    pub fn authority(&self) -> String {
        let inner = &*self.inner;
        if inner.host.is_empty() {
            return String::new();
        }

        let mut authority = String::with_capacity(inner.user_info.len() + inner.host.len() + 7);
        if !inner.user_info.is_empty() {
            authority.push_str(&inner.user_info);
            authority.push('@');
        }
        authority.push_str(&inner.host);
        if let Some(port) = inner.port {
            authority.push(':');
            authority.push_str(&port.to_string());
        }
        authority
    }

    /// Returns a URI with the given scheme.
    ///
    /// The stored port is re-checked against the new scheme's default port.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when `scheme` is non-empty and does not match
    /// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
    pub fn with_scheme(&self, scheme: &str) -> Result<Self, InvalidArgument> {
        let scheme = normalize_scheme(scheme)?;
        if self.inner.scheme == scheme {
            return Ok(self.clone());
        }

        Ok(self.derive(|inner| {
            inner.port = inner.port.and_then(|port| filter_port(&scheme, port));
            inner.scheme = scheme;
        }))
    }

    /// Returns a URI with user info `user[:password]`.
    ///
    /// The password is only appended when it is non-empty.
    pub fn with_user_info(&self, user: &str, password: Option<&str>) -> Self {
        let mut info = user.to_string();
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            info.push(':');
            info.push_str(password);
        }

        if self.inner.user_info == info {
            return self.clone();
        }
        self.derive(|inner| inner.user_info = info)
    }

    /// Returns a URI with the given host, lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when the host contains whitespace, control
    /// characters or any of `/ ? # @ :`, unless it is a bracketed IP literal.
    pub fn with_host(&self, host: &str) -> Result<Self, InvalidArgument> {
        let host = normalize_host(host)?;
        if self.inner.host == host {
            return Ok(self.clone());
        }
        Ok(self.derive(|inner| inner.host = host))
    }

    /// Returns a URI with the given port; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when `port` is above 65535.
    pub fn with_port(&self, port: Option<u32>) -> Result<Self, InvalidArgument> {
        let port = match port {
            Some(port) => filter_port(&self.inner.scheme, checked_port(port)?),
            None => None,
        };
        if self.inner.port == port {
            return Ok(self.clone());
        }
        Ok(self.derive(|inner| inner.port = port))
    }

    pub fn with_path(&self, path: &str) -> Self {
        let path = filter_path(path);
        if self.inner.path == path {
            return self.clone();
        }
        self.derive(|inner| inner.path = path)
    }

    pub fn with_query(&self, query: &str) -> Self {
        let query = filter_query_or_fragment(query);
        if self.inner.query == query {
            return self.clone();
        }
        self.derive(|inner| inner.query = query)
    }

    pub fn with_fragment(&self, fragment: &str) -> Self {
        let fragment = filter_query_or_fragment(fragment);
        if self.inner.fragment == fragment {
            return self.clone();
        }
        self.derive(|inner| inner.fragment = fragment)
    }

    fn derive(&self, change: impl FnOnce(&mut Inner)) -> Self {
        let mut inner = Inner::clone(&self.inner);
        change(&mut inner);
        Self { inner: Arc::new(inner) }
    }
}

fn normalize_scheme(scheme: &str) -> Result<String, InvalidArgument> {
    if let Some((first, tail)) = scheme.as_bytes().split_first() {
        ensure!(
            first.is_ascii_alphabetic() && tail.iter().all(|b| SCHEME[*b as usize]),
            InvalidArgument::invalid_scheme(scheme)
        );
    }
    Ok(scheme.to_ascii_lowercase())
}

fn normalize_host(host: &str) -> Result<String, InvalidArgument> {
    let valid = if host.starts_with('[') {
        parser::is_ip_literal(host)
    } else {
        host.bytes().all(|b| HOST[b as usize])
    };
    ensure!(valid, InvalidArgument::invalid_host(host));
    Ok(host.to_ascii_lowercase())
}

fn checked_port(port: u32) -> Result<u16, InvalidArgument> {
    u16::try_from(port).ok().ok_or_else(|| InvalidArgument::invalid_port(port))
}

/// Drops a port equal to the default of `scheme`.
fn filter_port(scheme: &str, port: u16) -> Option<u16> {
    let is_default = DEFAULT_PORTS.iter().any(|(name, default)| *name == scheme && *default == port);
    (!is_default).then_some(port)
}

impl Default for Uri {
    fn default() -> Self {
        Self { inner: Arc::new(Inner::default()) }
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.inner == *other.inner
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uri")
            .field("scheme", &self.inner.scheme)
            .field("user_info", &self.inner.user_info)
            .field("host", &self.inner.host)
            .field("port", &self.inner.port)
            .field("path", &self.inner.path)
            .field("query", &self.inner.query)
            .field("fragment", &self.inner.fragment)
            .finish()
    }
}

/// Renders the canonical string form.
///
/// A rootless path gets a leading `/` when an authority is present, and a path
/// starting with `//` is reduced to a single leading `/` when there is no
/// authority. Rendering a reparsed rendering yields the same string.
impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = &*self.inner;
        let authority = self.authority();

        if !inner.scheme.is_empty() {
            write!(f, "{}:", inner.scheme)?;
        }

        if !authority.is_empty() {
            write!(f, "//{authority}")?;
        }

        let path = inner.path.as_str();
        if !path.is_empty() {
            if !path.starts_with('/') {
                if !authority.is_empty() {
                    f.write_str("/")?;
                }
                f.write_str(path)?;
            } else if path.starts_with("//") && authority.is_empty() {
                write!(f, "/{}", path.trim_start_matches('/'))?;
            } else {
                f.write_str(path)?;
            }
        }

        if !inner.query.is_empty() {
            write!(f, "?{}", inner.query)?;
        }

        if !inner.fragment.is_empty() {
            write!(f, "#{}", inner.fragment)?;
        }

        Ok(())
    }
}
