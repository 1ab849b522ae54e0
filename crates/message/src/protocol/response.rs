//! HTTP response value type.

use http::StatusCode;

use super::body::MemoryStream;
use super::message::{Message, MessageParts, Sealed};
use crate::ensure;
use crate::error::{InvalidArgument, MessageError, Rejected};
use crate::header::{HeaderCollection, IntoHeaderValues};
use crate::matches::FIELD_VALUE;

/// An immutable HTTP response with a status code and a reason phrase.
///
/// The reason phrase defaults to the canonical one of the status code, or the
/// empty string for codes without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<B = MemoryStream> {
    status: StatusCode,
    reason_phrase: String,
    parts: MessageParts<B>,
}

impl Response {
    /// Creates a response with an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] unless `status` is within `100..=599`.
    pub fn new(status: u16) -> Result<Self, InvalidArgument> {
        Self::from_parts(status, None, HeaderCollection::new(), MemoryStream::new())
    }

    /// Creates a response, folding `headers` in the same way as
    /// [`HeaderCollection::from_iter_checked`].
    ///
    /// # Errors
    ///
    /// Fails on an invalid status code or header.
    pub fn from_headers<I, K, V>(status: u16, headers: I) -> Result<Self, MessageError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoHeaderValues,
    {
        let headers = HeaderCollection::from_iter_checked(headers)?;
        Ok(Self::from_parts(status, None, headers, MemoryStream::new())?)
    }
}

impl<B> Response<B> {
    /// Assembles a response from its pieces.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] unless `status` is within `100..=599` and the
    /// reason phrase holds only tab, space, visible ASCII or `obs-text`.
    pub fn from_parts(
        status: u16,
        reason_phrase: Option<&str>,
        headers: HeaderCollection,
        body: B,
    ) -> Result<Self, InvalidArgument> {
        let status = checked_status(status)?;
        let reason_phrase = reason_or_canonical(status, reason_phrase)?;
        Ok(Self { status, reason_phrase, parts: MessageParts::new(headers, body) })
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    /// Returns a response with another status code.
    ///
    /// Without an explicit `reason_phrase` the canonical one is used.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] for a status outside `100..=599` or a reason phrase
    /// with control characters, holding the unchanged response.
    pub fn with_status(mut self, status: u16, reason_phrase: Option<&str>) -> Result<Self, Rejected<Self>> {
        let checked = checked_status(status)
            .and_then(|status| reason_or_canonical(status, reason_phrase).map(|reason| (status, reason)));

        match checked {
            Ok((status, reason_phrase)) => {
                self.status = status;
                self.reason_phrase = reason_phrase;
                Ok(self)
            }
            Err(e) => Err(Rejected::new(self, e)),
        }
    }

    /// Replaces the body, possibly with one of another type.
    pub fn map_body<T, F: FnOnce(B) -> T>(self, f: F) -> Response<T> {
        Response { status: self.status, reason_phrase: self.reason_phrase, parts: self.parts.map_body(f) }
    }

    pub fn parts(&self) -> &MessageParts<B> {
        &self.parts
    }
}

fn checked_status(status: u16) -> Result<StatusCode, InvalidArgument> {
    ensure!((100..=599).contains(&status), InvalidArgument::invalid_status(status));
    StatusCode::from_u16(status).ok().ok_or_else(|| InvalidArgument::invalid_status(status))
}

/// A custom reason must match `*( HTAB / SP / VCHAR / obs-text )`.
fn reason_or_canonical(status: StatusCode, reason_phrase: Option<&str>) -> Result<String, InvalidArgument> {
    match reason_phrase {
        Some(reason) => {
            ensure!(
                reason.bytes().all(|b| FIELD_VALUE[b as usize]),
                InvalidArgument::invalid_reason_phrase(reason)
            );
            Ok(reason.to_string())
        }
        None => Ok(status.canonical_reason().unwrap_or_default().to_string()),
    }
}

impl<B> Sealed for Response<B> {
    type Body = B;

    #[inline]
    fn parts(&self) -> &MessageParts<B> {
        &self.parts
    }

    #[inline]
    fn parts_mut(&mut self) -> &mut MessageParts<B> {
        &mut self.parts
    }
}

impl<B> Message for Response<B> {
    fn into_body(self) -> B {
        self.parts.body
    }
}

/// Converts into an [`http::Response`]. A custom reason phrase is dropped.
impl<B> TryFrom<Response<B>> for http::Response<B> {
    type Error = MessageError;

    fn try_from(response: Response<B>) -> Result<Self, Self::Error> {
        let headers = http::HeaderMap::try_from(&response.parts.headers)?;

        let mut converted = http::Response::new(response.parts.body);
        *converted.status_mut() = response.status;
        *converted.version_mut() = response.parts.version;
        *converted.headers_mut() = headers;
        Ok(converted)
    }
}

impl<B> TryFrom<http::Response<B>> for Response<B> {
    type Error = MessageError;

    fn try_from(response: http::Response<B>) -> Result<Self, Self::Error> {
        let (head, body) = response.into_parts();
        let headers = HeaderCollection::try_from(&head.headers)?;
        let mut converted = Response::from_parts(head.status.as_u16(), None, headers, body)?;
        converted.parts.version = head.version;
        Ok(converted)
    }
}
