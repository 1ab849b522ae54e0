//! HTTP request value type.
//!
//! A [`Request`] holds a method, a [`Uri`], an optional explicit request target
//! and the shared [`MessageParts`]. Whenever the URI's host is taken over into
//! the headers, the `Host` header is placed first, as RFC 7230 §5.4 asks.

use std::borrow::Cow;

use http::{Method, Version};
use tracing::trace;

use super::body::MemoryStream;
use super::message::{Message, MessageParts, Sealed};
use crate::error::{InvalidArgument, MessageError, Rejected};
use crate::header::{HeaderCollection, IntoHeaderValues};
use crate::uri::Uri;

/// An immutable HTTP request.
///
/// # Example
///
/// ```
/// use http::Method;
/// use micro_message::protocol::{Message, Request};
/// use micro_message::uri::Uri;
///
/// let uri = Uri::parse("http://example.com:8080/search?q=rust").unwrap();
/// let request = Request::new(Method::GET, uri);
///
/// assert_eq!(request.request_target(), "/search?q=rust");
/// assert_eq!(request.header_line("host"), "example.com:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<B = MemoryStream> {
    method: Method,
    request_target: Option<String>,
    uri: Uri,
    parts: MessageParts<B>,
}

impl Request {
    /// Creates a request with an empty body, taking `Host` from the URI.
    pub fn new(method: Method, uri: Uri) -> Self {
        let mut request = Request {
            method,
            request_target: None,
            uri,
            parts: MessageParts::new(HeaderCollection::new(), MemoryStream::new()),
        };
        request.update_host_from_uri();
        request
    }

    /// Creates a request builder.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }
}

impl<B> Request<B> {
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The explicit request target if one was set, otherwise the origin-form
    /// derived from the URI: its path (`/` when empty) followed by `?query`.
    pub fn request_target(&self) -> Cow<'_, str> {
        if let Some(target) = &self.request_target {
            return Cow::Borrowed(target);
        }

        let path = match self.uri.path() {
            "" => "/",
            path => path,
        };
        match self.uri.query() {
            "" => Cow::Borrowed(path),
            query => Cow::Owned(format!("{path}?{query}")),
        }
    }

    /// Returns a request with an explicit request target.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] when the target contains whitespace, holding the
    /// unchanged request.
    pub fn with_request_target<T: Into<String>>(mut self, target: T) -> Result<Self, Rejected<Self>> {
        let target = target.into();
        if target.chars().any(char::is_whitespace) {
            return Err(Rejected::new(self, InvalidArgument::invalid_request_target(target)));
        }

        self.request_target = Some(target);
        Ok(self)
    }

    /// Returns a request with the given method. Methods are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] when `method` is not a valid token, holding the
    /// unchanged request.
    pub fn with_method(mut self, method: &str) -> Result<Self, Rejected<Self>> {
        match parse_method(method) {
            Ok(method) => {
                self.method = method;
                Ok(self)
            }
            Err(e) => Err(Rejected::new(self, e)),
        }
    }

    /// Returns a request with the given URI.
    ///
    /// The `Host` header is rewritten from the new URI unless `preserve_host` is
    /// set and a `Host` header is already present. Handing back the current URI
    /// instance is a no-op.
    #[must_use]
    pub fn with_uri(mut self, uri: Uri, preserve_host: bool) -> Self {
        if Uri::ptr_eq(&self.uri, &uri) {
            return self;
        }

        self.uri = uri;
        if !preserve_host || !self.parts.headers.has("Host") {
            self.update_host_from_uri();
        }
        self
    }

    /// Replaces the body, possibly with one of another type.
    pub fn map_body<T, F: FnOnce(B) -> T>(self, f: F) -> Request<T> {
        Request {
            method: self.method,
            request_target: self.request_target,
            uri: self.uri,
            parts: self.parts.map_body(f),
        }
    }

    pub fn parts(&self) -> &MessageParts<B> {
        &self.parts
    }

    /// Puts `Host: host[:port]` first when the URI has a host.
    fn update_host_from_uri(&mut self) {
        let host = self.uri.host();
        if host.is_empty() {
            return;
        }

        let host = match self.uri.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        self.parts.headers = self.parts.headers.with_host_first(host);
    }

    /// Assembles a request from already validated pieces, as the head decoder does.
    pub(crate) fn from_validated(
        method: Method,
        uri: Uri,
        request_target: Option<String>,
        headers: HeaderCollection,
        version: Version,
        body: B,
    ) -> Self {
        let mut parts = MessageParts::new(headers, body);
        parts.version = version;

        let mut request = Request { method, request_target, uri, parts };
        if !request.parts.headers.has("Host") {
            request.update_host_from_uri();
        }
        request
    }
}

fn parse_method(method: &str) -> Result<Method, InvalidArgument> {
    Method::from_bytes(method.as_bytes()).ok().ok_or_else(|| InvalidArgument::invalid_method(method))
}

impl<B> Sealed for Request<B> {
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

impl<B> Message for Request<B> {
    fn into_body(self) -> B {
        self.parts.body
    }
}

/// Builds a [`Request`] from a method, a URI and a header map.
///
/// Headers are folded in with merge semantics, repeated names accumulate
/// values. `Host` is taken from the URI only when no `Host` header was given.
/// The first error is kept and returned by [`RequestBuilder::body`].
#[derive(Debug)]
pub struct RequestBuilder {
    inner: Result<BuilderParts, MessageError>,
}

#[derive(Debug)]
struct BuilderParts {
    method: Method,
    uri: Uri,
    headers: HeaderCollection,
    version: Version,
}

impl RequestBuilder {
    pub fn new() -> Self {
        let parts = BuilderParts {
            method: Method::GET,
            uri: Uri::default(),
            headers: HeaderCollection::new(),
            version: Version::HTTP_11,
        };
        Self { inner: Ok(parts) }
    }

    #[must_use]
    pub fn method<M: AsRef<str>>(self, method: M) -> Self {
        self.and_then(|mut parts| {
            parts.method = parse_method(method.as_ref())?;
            Ok(parts)
        })
    }

    /// Sets the URI from a string or an existing [`Uri`].
    #[must_use]
    pub fn uri<U>(self, uri: U) -> Self
    where
        U: TryInto<Uri>,
        U::Error: Into<MessageError>,
    {
        self.and_then(|mut parts| {
            parts.uri = uri.try_into().map_err(Into::into)?;
            Ok(parts)
        })
    }

    /// Adds header values; repeated names accumulate.
    #[must_use]
    pub fn header<V: IntoHeaderValues>(self, name: &str, value: V) -> Self {
        self.and_then(|mut parts| {
            parts.headers = parts.headers.with_added_header(name, value)?;
            Ok(parts)
        })
    }

    #[must_use]
    pub fn version(self, version: Version) -> Self {
        self.and_then(|mut parts| {
            parts.version = version;
            Ok(parts)
        })
    }

    /// Finishes the request with `body`.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by a previous builder call.
    pub fn body<B>(self, body: B) -> Result<Request<B>, MessageError> {
        let parts = self.inner?;
        trace!(method = %parts.method, uri = %parts.uri, "build request");
        Ok(Request::from_validated(parts.method, parts.uri, None, parts.headers, parts.version, body))
    }

    fn and_then<F>(self, f: F) -> Self
    where
        F: FnOnce(BuilderParts) -> Result<BuilderParts, MessageError>,
    {
        Self { inner: self.inner.and_then(f) }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts into an [`http::Request`]. The request target is not carried over
/// when it differs from the URI, and the URI must be acceptable to the `http` crate.
impl<B> TryFrom<Request<B>> for http::Request<B> {
    type Error = MessageError;

    fn try_from(request: Request<B>) -> Result<Self, Self::Error> {
        let uri = match request.uri.to_string() {
            uri if uri.is_empty() => http::Uri::try_from(request.request_target().as_ref())
                .map_err(crate::error::ParseError::invalid_uri)?,
            _ => http::Uri::try_from(&request.uri)?,
        };
        let headers = http::HeaderMap::try_from(&request.parts.headers)?;

        let mut converted = http::Request::new(request.parts.body);
        *converted.method_mut() = request.method;
        *converted.uri_mut() = uri;
        *converted.version_mut() = request.parts.version;
        *converted.headers_mut() = headers;
        Ok(converted)
    }
}

/// Converts from an [`http::Request`], validating its headers.
impl<B> TryFrom<http::Request<B>> for Request<B> {
    type Error = MessageError;

    fn try_from(request: http::Request<B>) -> Result<Self, Self::Error> {
        let (head, body) = request.into_parts();
        let uri = Uri::try_from(&head.uri)?;
        let headers = HeaderCollection::try_from(&head.headers)?;
        Ok(Request::from_validated(head.method, uri, None, headers, head.version, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BodyStream;

    fn names<B>(request: &Request<B>) -> Vec<String> {
        request.headers().names().map(ToString::to_string).collect()
    }

    #[test]
    fn host_header_is_first() {
        let request = Request::builder()
            .uri("http://example.com/")
            .header("Accept", "*/*")
            .header("X-Foo", "bar")
            .body(MemoryStream::new())
            .unwrap();

        let (name, values) = request.headers().iter().next().unwrap();
        assert_eq!(name, "Host");
        assert_eq!(values, ["example.com"]);
        assert_eq!(names(&request), ["Host", "Accept", "X-Foo"]);
    }

    #[test]
    fn explicit_host_is_kept() {
        let request = Request::builder()
            .uri("http://example.com/")
            .header("X-Foo", "bar")
            .header("host", "other.example")
            .body(())
            .unwrap();

        assert_eq!(request.header("Host"), ["other.example"]);
        assert_eq!(names(&request), ["X-Foo", "host"]);
    }

    #[test]
    fn host_includes_explicit_port() {
        let request = Request::new(Method::GET, Uri::parse("https://example.com:8443/").unwrap());
        assert_eq!(request.header_line("host"), "example.com:8443");

        let request = Request::new(Method::GET, Uri::parse("https://example.com:443/").unwrap());
        assert_eq!(request.header_line("host"), "example.com");
    }

    #[test]
    fn no_host_without_uri_host() {
        let request = Request::new(Method::GET, Uri::parse("/relative").unwrap());
        assert!(!request.has_header("Host"));
        assert!(request.headers().is_empty());
    }

    #[test]
    fn request_target_derivation() {
        let request = Request::new(Method::GET, Uri::parse("http://example.com").unwrap());
        assert_eq!(request.request_target(), "/");

        let request = Request::new(Method::GET, Uri::parse("http://example.com/a?b=c#d").unwrap());
        assert_eq!(request.request_target(), "/a?b=c");

        let request = request.with_request_target("*").unwrap();
        assert_eq!(request.request_target(), "*");
    }

    #[test]
    fn request_target_rejects_whitespace() {
        let request = Request::new(Method::GET, Uri::default());
        let rejected = request.clone().with_request_target("/a b").unwrap_err();
        assert_eq!(*rejected.error(), InvalidArgument::invalid_request_target("/a b"));
        assert_eq!(rejected.into_message(), request);
        assert!(request.with_request_target("/a\tb").is_err());
    }

    #[test]
    fn with_method_validates() {
        let request = Request::new(Method::GET, Uri::default());
        let request = request.with_method("PURGE").unwrap();
        assert_eq!(request.method().as_str(), "PURGE");

        let request = request.with_method("BAD METHOD").unwrap_err().into_message();
        assert_eq!(request.method().as_str(), "PURGE");
    }

    #[test]
    fn with_uri_updates_host() {
        let request = Request::builder()
            .uri("http://foo.example/")
            .header("Accept", "*/*")
            .body(MemoryStream::new())
            .unwrap();

        let moved = request.clone().with_uri(Uri::parse("http://bar.example:8080/x").unwrap(), false);
        assert_eq!(moved.header("host"), ["bar.example:8080"]);
        assert_eq!(names(&moved), ["Host", "Accept"]);

        let preserved = request.clone().with_uri(Uri::parse("http://bar.example/").unwrap(), true);
        assert_eq!(preserved.header("host"), ["foo.example"]);
        assert_eq!(preserved.uri().host(), "bar.example");

        assert_eq!(request.header("host"), ["foo.example"]);
    }

    #[test]
    fn with_uri_preserve_host_without_host_header() {
        let request = Request::new(Method::GET, Uri::default());
        let request = request.with_uri(Uri::parse("http://example.com/").unwrap(), true);
        assert_eq!(request.header("Host"), ["example.com"]);
    }

    #[test]
    fn with_uri_reuses_host_casing() {
        let request = Request::builder().uri("/").header("HOST", "a.example").body(()).unwrap();
        let request = request.with_uri(Uri::parse("http://b.example/").unwrap(), false);
        assert_eq!(names(&request), ["HOST"]);
        assert_eq!(request.header("host"), ["b.example"]);
    }

    #[test]
    fn with_same_uri_is_no_op() {
        let uri = Uri::parse("http://example.com/").unwrap();
        let request = Request::new(Method::GET, uri.clone()).without_header("Host");
        let request = request.with_uri(uri, false);
        assert!(!request.has_header("Host"));
    }

    #[test]
    fn message_operations() {
        let request = Request::new(Method::POST, Uri::parse("http://example.com/").unwrap())
            .with_header("Content-Type", "text/plain")
            .unwrap()
            .with_added_header("X-Tag", ["a", "b"])
            .unwrap()
            .with_version(Version::HTTP_10)
            .with_body(MemoryStream::from("payload"));

        assert_eq!(request.version(), Version::HTTP_10);
        assert!(request.has_header("content-type"));
        assert_eq!(request.header_line("x-tag"), "a, b");

        let request = request.without_header("X-TAG");
        assert!(!request.has_header("x-tag"));

        let mut body = request.into_body();
        assert_eq!(body.stringify(), "payload");
    }

    #[test]
    fn rejected_header_hands_request_back() {
        let request = Request::new(Method::GET, Uri::parse("http://example.com/").unwrap())
            .with_header("Accept", "*/*")
            .unwrap();

        let rejected = request.clone().with_header("Bad Name", "v").unwrap_err();
        assert_eq!(*rejected.error(), InvalidArgument::invalid_header_name("Bad Name"));
        let (kept, _) = rejected.into_parts();
        assert_eq!(kept, request);

        let kept = request.clone().with_added_header("X", "bad\x01value").unwrap_err().into_message();
        assert_eq!(kept.header_line("accept"), "*/*");
        assert_eq!(kept, request);

        let err = MessageError::from(request.with_header("X", Vec::<String>::new()).unwrap_err());
        assert!(matches!(err, MessageError::InvalidArgument { source: InvalidArgument::EmptyHeaderValues { .. } }));
    }

    #[test]
    fn builder_keeps_first_error() {
        let err = Request::builder().uri("http:///::::").header("Bad Name", "v").body(()).unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));

        let err = Request::builder().header("X", "bad\x01").body(()).unwrap_err();
        assert!(matches!(err, MessageError::InvalidArgument { source: InvalidArgument::InvalidHeaderValue { .. } }));

        let err = Request::builder().method("BAD METHOD").body(()).unwrap_err();
        assert!(matches!(err, MessageError::InvalidArgument { source: InvalidArgument::InvalidMethod { .. } }));
    }

    #[test]
    fn builder_accepts_uri_value() {
        let uri = Uri::parse("https://example.com/").unwrap();
        let request = Request::builder().method("PUT").uri(uri.clone()).body(()).unwrap();
        assert!(Uri::ptr_eq(request.uri(), &uri));
        assert_eq!(*request.method(), Method::PUT);
    }

    #[test]
    fn http_request_interop() {
        let request = Request::builder()
            .method("POST")
            .uri("http://example.com:8080/submit?x=1")
            .header("Content-Type", "application/json")
            .body("{}".to_string())
            .unwrap();

        let converted = http::Request::try_from(request).unwrap();
        assert_eq!(*converted.method(), Method::POST);
        assert_eq!(converted.uri().path(), "/submit");
        assert_eq!(converted.headers().get("host").unwrap(), "example.com:8080");
        assert_eq!(converted.body(), "{}");

        let back = Request::try_from(converted).unwrap();
        assert_eq!(back.uri().to_string(), "http://example.com:8080/submit?x=1");
        assert_eq!(back.header("content-type"), ["application/json"]);
    }
}
