//! Message head encoder.
//!
//! Writes `start-line CRLF *(field-line CRLF) CRLF`. Each header is written on
//! a single line with its values joined by `", "`, under its declared casing.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use http::Version;
use tokio_util::codec::Encoder;
use tracing::error;

use crate::error::SendError;
use crate::header::HeaderCollection;
use crate::protocol::{Message, Request, Response};

/// Initial buffer size reserved for a head
const INIT_HEAD_SIZE: usize = 1024;

/// Encoder for request and response heads.
///
/// Bodies are left to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadEncoder;

impl<B> Encoder<&Request<B>> for HeadEncoder {
    type Error = SendError;

    fn encode(&mut self, request: &Request<B>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let version = version_str(request.version())?;

        dst.reserve(INIT_HEAD_SIZE);
        write!(FastWrite(dst), "{} {} {version}\r\n", request.method(), request.request_target())?;
        write_headers(request.headers(), dst);
        Ok(())
    }
}

impl<B> Encoder<&Response<B>> for HeadEncoder {
    type Error = SendError;

    fn encode(&mut self, response: &Response<B>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let version = version_str(response.version())?;

        dst.reserve(INIT_HEAD_SIZE);
        write!(FastWrite(dst), "{version} {} {}\r\n", response.status().as_str(), response.reason_phrase())?;
        write_headers(response.headers(), dst);
        Ok(())
    }
}

fn version_str(version: Version) -> Result<&'static str, SendError> {
    match version {
        Version::HTTP_10 => Ok("HTTP/1.0"),
        Version::HTTP_11 => Ok("HTTP/1.1"),
        v => {
            error!(http_version = ?v, "unsupported http version");
            Err(SendError::UnsupportedVersion(v))
        }
    }
}

fn write_headers(headers: &HeaderCollection, dst: &mut BytesMut) {
    for (name, values) in headers {
        dst.put_slice(name.as_str().as_bytes());
        dst.put_slice(b": ");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                dst.put_slice(b", ");
            }
            dst.put_slice(value.as_bytes());
        }
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}

/// `io::Write` adapter appending to a `BytesMut`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
