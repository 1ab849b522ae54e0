//! Immutable HTTP message values
//!
//! This crate models HTTP requests, responses and URIs as immutable values that
//! follow RFC 3986 (URI) and RFC 7230 (HTTP/1.1 message syntax). It has no
//! socket or connection handling of its own and can sit underneath any client
//! or server that needs a shared in-memory representation of a message.
//!
//! # Features
//!
//! - URI parsing, normalization and canonical rendering
//! - Idempotent percent-encoding of path, query and fragment
//! - Ordered, case-insensitive and case-preserving header storage
//! - RFC 7230 validation of header names and values
//! - Copy-on-write updates, a no-op update hands back the identical instance
//! - Request `Host` header kept first and in sync with the URI
//! - Request head decoding and head encoding on top of `tokio_util::codec`
//! - Conversions to and from the `http` crate types
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{Message, Request};
//! use micro_message::uri::Uri;
//!
//! let uri = Uri::parse("HTTPS://Example.COM:443/a b?q=1#top").unwrap();
//! assert_eq!(uri.to_string(), "https://example.com/a%20b?q=1#top");
//! assert_eq!(uri.port(), None);
//!
//! let request = Request::builder()
//!     .method("POST")
//!     .uri(uri)
//!     .header("Content-Type", "application/json")
//!     .header("Accept", ["text/html", "*/*"])
//!     .body(())
//!     .unwrap();
//!
//! let names: Vec<_> = request.headers().names().map(|name| name.as_str()).collect();
//! assert_eq!(names, ["Host", "Content-Type", "Accept"]);
//! assert_eq!(request.header_line("accept"), "text/html, */*");
//!
//! let request = request.without_header("content-type");
//! assert!(!request.has_header("Content-Type"));
//! ```
//!
//! # Architecture
//!
//! - [`uri`]: the [`Uri`](uri::Uri) value type
//! - [`header`]: header names, values and the [`HeaderCollection`](header::HeaderCollection)
//! - [`protocol`]: [`Request`](protocol::Request), [`Response`](protocol::Response) and body streams
//! - [`codec`]: request head decoder and head encoder
//!
//! # Error Handling
//!
//! - [`ParseError`]: the input cannot be decomposed into a URI or a request head
//! - [`InvalidArgument`]: a constructor or `with_*` argument is rejected
//! - [`Rejected`]: wraps [`InvalidArgument`] for consuming message operations and hands the message back
//! - [`SendError`]: a head cannot be encoded
//! - [`StreamError`]: a body stream operation failed
//! - [`MessageError`]: umbrella error of the builders and conversions
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 heads only
//! - Maximum head size while decoding: 8KB by default
//! - Maximum number of headers while decoding: 64 by default

pub mod codec;
pub mod header;
pub mod protocol;
pub mod uri;

mod error;
pub use error::InvalidArgument;
pub use error::MessageError;
pub use error::ParseError;
pub use error::Rejected;
pub use error::SendError;
pub use error::StreamError;

mod matches;

mod utils;
pub(crate) use utils::ensure;
