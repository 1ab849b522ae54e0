use std::fmt;
use std::str::FromStr;

use crate::ensure;
use crate::error::InvalidArgument;
use crate::matches::TOKEN;

/// HTTP header name.
///
/// Guaranteed to match the RFC 7230 `token` grammar, so it never needs to be
/// validated again after construction.
///
/// # Case
///
/// The declared casing is kept as given. Equality through [`PartialEq`] is exact,
/// use [`HeaderName::eq_ignore_case`] for the case-insensitive comparison
/// HTTP mandates.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderName(String);

impl HeaderName {
    /// Validates `name` against the token grammar.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when the name is empty or contains a non-token byte.
    pub fn new<S: Into<String>>(name: S) -> Result<Self, InvalidArgument> {
        let name = name.into();
        ensure!(is_token(&name), InvalidArgument::invalid_header_name(name));
        Ok(Self(name))
    }

    /// Wraps a name known to be a token.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(is_token(name), "{name:?} is not a token");
        Self(name.to_string())
    }

    /// Extracts a string slice with the declared casing.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks that two header names are an ASCII case-insensitive match.
    #[inline]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// The lowercase form used as lookup key.
    #[inline]
    pub(crate) fn key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

pub(crate) fn is_token(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| TOKEN[b as usize])
}

impl AsRef<str> for HeaderName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HeaderName {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for HeaderName {
    type Error = InvalidArgument;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for HeaderName {
    type Error = InvalidArgument;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<str> for HeaderName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
