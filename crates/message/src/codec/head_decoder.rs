//! Request head decoder.
//!
//! Parses the request line and header lines with `httparse`, then hands the
//! pieces to the URI parser and the header collection so the decoded request
//! obeys the same normalization and validation as one built in code.

use bytes::{Buf, BytesMut};
use http::{Method, Version};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use super::HeadLimits;
use crate::ensure;
use crate::error::ParseError;
use crate::header::HeaderCollection;
use crate::protocol::Request;
use crate::uri::Uri;

/// Decoder turning a request head into a [`Request<()>`].
///
/// The raw target of the request line is kept as the request target and also
/// parsed into the request URI. Headers are kept as sent, `Host` included, and
/// repeated names are merged in order of appearance.
#[derive(Debug, Clone, Default)]
pub struct RequestHeadDecoder {
    limits: HeadLimits,
}

impl RequestHeadDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: HeadLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> HeadLimits {
        self.limits
    }
}

impl Decoder for RequestHeadDecoder {
    type Item = Request<()>;
    type Error = ParseError;

    /// Returns `Ok(None)` until a complete head is buffered. On success the head
    /// bytes are consumed from `src`.
    ///
    /// # Errors
    ///
    /// Fails when a limit of [`HeadLimits`] is exceeded, the version is neither
    /// HTTP/1.0 nor HTTP/1.1, or the method, target or a header is invalid.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let HeadLimits { max_headers, max_head_bytes } = self.limits;
        let mut headers = vec![httparse::EMPTY_HEADER; max_headers];
        let mut req = httparse::Request::new(&mut headers);

        let status = req.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(max_headers),
            e => ParseError::invalid_header(e.to_string()),
        })?;

        let head_len = match status {
            Status::Complete(head_len) => head_len,
            Status::Partial => {
                ensure!(src.len() <= max_head_bytes, ParseError::too_large_header(src.len(), max_head_bytes));
                return Ok(None);
            }
        };
        trace!(head_len, header_count = req.headers.len(), "parsed request head");
        ensure!(head_len <= max_head_bytes, ParseError::too_large_header(head_len, max_head_bytes));

        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            v => return Err(ParseError::InvalidVersion(v)),
        };

        let method = req.method.ok_or(ParseError::InvalidMethod)?;
        let method = Method::from_bytes(method.as_bytes()).ok().ok_or(ParseError::InvalidMethod)?;
        let target = req.path.ok_or(ParseError::MissingTarget)?;
        let uri = target_uri(&method, target)?;

        let mut fields = Vec::with_capacity(req.headers.len());
        for header in req.headers.iter() {
            let value = std::str::from_utf8(header.value)
                .map_err(|e| ParseError::invalid_header(format!("{}: {e}", header.name)))?;
            fields.push((header.name, value));
        }
        let headers = HeaderCollection::from_iter_checked(fields).map_err(ParseError::invalid_header)?;

        let request = Request::from_validated(method, uri, Some(target.to_string()), headers, version, ());
        src.advance(head_len);

        Ok(Some(request))
    }
}

/// Parses the request target into a URI.
///
/// The origin-form is always a path, even when it starts with `//`. The
/// asterisk-form (`*`) maps to an empty URI, the authority-form of `CONNECT`
/// is parsed as an authority.
fn target_uri(method: &Method, target: &str) -> Result<Uri, ParseError> {
    if target.starts_with('/') {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        return Ok(Uri::default().with_path(path).with_query(query));
    }

    let parsed = match target {
        "*" => Ok(Uri::default()),
        _ if *method == Method::CONNECT => Uri::parse(&format!("//{target}")),
        _ => Uri::parse(target),
    };
    parsed.inspect_err(|e| debug!(request_target = target, cause = %e, "invalid request target"))
}
