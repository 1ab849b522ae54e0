//! Conversions between [`Uri`] and strings or [`http::Uri`].

use std::str::FromStr;

use super::Uri;
use crate::error::ParseError;

impl FromStr for Uri {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = ParseError;

    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Uri::parse(value)
    }
}

impl TryFrom<String> for Uri {
    type Error = ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Uri::parse(&value)
    }
}

impl TryFrom<&String> for Uri {
    type Error = ParseError;

    #[inline]
    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Uri::parse(value)
    }
}

impl TryFrom<&http::Uri> for Uri {
    type Error = ParseError;

    fn try_from(value: &http::Uri) -> Result<Self, Self::Error> {
        Uri::parse(&value.to_string())
    }
}

/// [`http::Uri`] is stricter than RFC 3986 (it rejects fragments, user info
/// in origin-form and several relative references), so the conversion can fail.
impl TryFrom<&Uri> for http::Uri {
    type Error = ParseError;

    fn try_from(value: &Uri) -> Result<Self, Self::Error> {
        http::Uri::try_from(value.to_string()).map_err(ParseError::invalid_uri)
    }
}

impl From<Uri> for String {
    fn from(value: Uri) -> Self {
        value.to_string()
    }
}
