//! Wire codec for message heads.
//!
//! - [`RequestHeadDecoder`]: decodes a request head from bytes into a [`Request<()>`](crate::protocol::Request)
//! - [`HeadEncoder`]: writes the start line and header lines of a request or response
//!
//! Both plug into `tokio_util::codec` framing. Bodies are not framed here, the
//! bytes following a decoded head stay in the source buffer.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_message::codec::{HeadEncoder, RequestHeadDecoder};
//! use micro_message::protocol::Message;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut src = BytesMut::from("GET /a?b=c HTTP/1.1\r\nHost: example.com\r\n\r\n");
//! let request = RequestHeadDecoder::new().decode(&mut src).unwrap().unwrap();
//! assert_eq!(request.header_line("host"), "example.com");
//!
//! let mut dst = BytesMut::new();
//! HeadEncoder.encode(&request, &mut dst).unwrap();
//! assert_eq!(&dst[..], b"GET /a?b=c HTTP/1.1\r\nHost: example.com\r\n\r\n");
//! ```

mod head_decoder;
mod head_encoder;

pub use head_decoder::RequestHeadDecoder;
pub use head_encoder::HeadEncoder;

/// Maximum number of header lines in a request head.
const DEFAULT_MAX_HEADERS: usize = 64;

/// Maximum size in bytes of a request head, start line included.
const DEFAULT_MAX_HEAD_BYTES: usize = 8 * 1024;

/// Bounds applied while decoding a request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadLimits {
    pub max_headers: usize,
    pub max_head_bytes: usize,
}

impl HeadLimits {
    pub const fn new(max_headers: usize, max_head_bytes: usize) -> Self {
        Self { max_headers, max_head_bytes }
    }
}

impl Default for HeadLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADERS, DEFAULT_MAX_HEAD_BYTES)
    }
}
