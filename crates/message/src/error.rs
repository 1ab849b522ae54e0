use std::convert::Infallible;
use std::error::Error as StdError;
use std::{fmt, io};

use http::Version;
use thiserror::Error;

/// Top-level error of the crate.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("invalid argument: {source}")]
    InvalidArgument {
        #[from]
        source: InvalidArgument,
    },
}

impl From<Infallible> for MessageError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Raised when input text cannot be decomposed into a URI or a request head.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid port {port:?}, must be digits between 0 and 65535")]
    InvalidPort { port: String },

    #[error("invalid host {host:?}")]
    InvalidHost { host: String },

    #[error("invalid ip literal {literal:?}")]
    InvalidIpLiteral { literal: String },

    #[error("authority {authority:?} has no host")]
    MissingHost { authority: String },

    #[error("invalid uri: {reason}")]
    InvalidUri { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(Option<u8>),

    #[error("invalid http method")]
    InvalidMethod,

    #[error("missing request target")]
    MissingTarget,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_port<S: ToString>(port: S) -> Self {
        Self::InvalidPort { port: port.to_string() }
    }

    pub fn invalid_host<S: ToString>(host: S) -> Self {
        Self::InvalidHost { host: host.to_string() }
    }

    pub fn invalid_ip_literal<S: ToString>(literal: S) -> Self {
        Self::InvalidIpLiteral { literal: literal.to_string() }
    }

    pub fn missing_host<S: ToString>(authority: S) -> Self {
        Self::MissingHost { authority: authority.to_string() }
    }

    pub fn invalid_uri<S: ToString>(reason: S) -> Self {
        Self::InvalidUri { reason: reason.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn invalid_header<S: ToString>(reason: S) -> Self {
        Self::InvalidHeader { reason: reason.to_string() }
    }
}

/// Raised when an argument handed to a constructor or a `with_*` operation is rejected.
///
/// No partially built value is ever returned alongside this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("invalid port: {port}, must be between 0 and 65535")]
    InvalidPort { port: u32 },

    #[error("invalid scheme {scheme:?}")]
    InvalidScheme { scheme: String },

    #[error("invalid host {host:?}")]
    InvalidHost { host: String },

    #[error("header name must be an RFC 7230 compatible string, got {name:?}")]
    InvalidHeaderName { name: String },

    #[error("header values must be RFC 7230 compatible strings, got {value:?}")]
    InvalidHeaderValue { value: String },

    #[error("header values of {name:?} must not be empty")]
    EmptyHeaderValues { name: String },

    #[error("invalid request target {target:?}, cannot contain whitespace")]
    InvalidRequestTarget { target: String },

    #[error("invalid method {method:?}")]
    InvalidMethod { method: String },

    #[error("invalid status code {code}, must be between 100 and 599")]
    InvalidStatus { code: u16 },

    #[error("invalid reason phrase {reason:?}, cannot contain control characters")]
    InvalidReasonPhrase { reason: String },
}

impl InvalidArgument {
    pub fn invalid_port(port: u32) -> Self {
        Self::InvalidPort { port }
    }

    pub fn invalid_scheme<S: ToString>(scheme: S) -> Self {
        Self::InvalidScheme { scheme: scheme.to_string() }
    }

    pub fn invalid_host<S: ToString>(host: S) -> Self {
        Self::InvalidHost { host: host.to_string() }
    }

    pub fn invalid_header_name<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderName { name: name.to_string() }
    }

    pub fn invalid_header_value<S: ToString>(value: S) -> Self {
        Self::InvalidHeaderValue { value: value.to_string() }
    }

    pub fn empty_header_values<S: ToString>(name: S) -> Self {
        Self::EmptyHeaderValues { name: name.to_string() }
    }

    pub fn invalid_request_target<S: ToString>(target: S) -> Self {
        Self::InvalidRequestTarget { target: target.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_status(code: u16) -> Self {
        Self::InvalidStatus { code }
    }

    pub fn invalid_reason_phrase<S: ToString>(reason: S) -> Self {
        Self::InvalidReasonPhrase { reason: reason.to_string() }
    }
}

/// Returned by a consuming message operation whose argument was rejected.
///
/// Carries the message back unchanged, so a bad argument never costs the caller
/// the message itself.
pub struct Rejected<M> {
    message: M,
    source: InvalidArgument,
}

impl<M> Rejected<M> {
    pub(crate) fn new(message: M, source: InvalidArgument) -> Self {
        Self { message, source }
    }

    /// The reason the argument was rejected.
    pub fn error(&self) -> &InvalidArgument {
        &self.source
    }

    /// Returns the untouched message.
    pub fn into_message(self) -> M {
        self.message
    }

    pub fn into_parts(self) -> (M, InvalidArgument) {
        (self.message, self.source)
    }
}

impl<M> fmt::Debug for Rejected<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected").field("source", &self.source).finish_non_exhaustive()
    }
}

impl<M> fmt::Display for Rejected<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<M> StdError for Rejected<M> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

impl<M> From<Rejected<M>> for InvalidArgument {
    fn from(rejected: Rejected<M>) -> Self {
        rejected.source
    }
}

impl<M> From<Rejected<M>> for MessageError {
    fn from(rejected: Rejected<M>) -> Self {
        rejected.source.into()
    }
}

/// Raised while encoding a message head.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("unsupported http version {0:?}")]
    UnsupportedVersion(Version),

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Raised by a [`BodyStream`](crate::protocol::BodyStream) operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream is closed")]
    Closed,

    #[error("stream is not writable")]
    NotWritable,

    #[error("unable to seek to stream position {position}")]
    InvalidSeek { position: i128 },
}
