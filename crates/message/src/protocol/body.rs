//! Body stream capability and its in-memory implementation.
//!
//! Messages hand their body around by ownership and never copy it, so the
//! stream's own position and contents are the only mutable state a message
//! ever refers to.

use std::io::SeekFrom;

use bytes::{Bytes, BytesMut};

use crate::error::StreamError;

/// The operations a message body must support.
pub trait BodyStream {
    /// Reads up to `len` bytes from the current position.
    ///
    /// # Errors
    ///
    /// Fails when the stream is closed.
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError>;

    /// Writes `data` at the current position and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Fails when the stream is closed or not writable.
    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError>;

    /// Moves the position and returns the new one.
    ///
    /// # Errors
    ///
    /// Fails when the stream is closed or the target is out of bounds.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError>;

    /// Returns the current position.
    ///
    /// # Errors
    ///
    /// Fails when the stream is closed.
    fn tell(&self) -> Result<u64, StreamError>;

    /// Total size in bytes, if known.
    fn size(&self) -> Option<u64>;

    /// Returns `true` when the position is at the end of the stream.
    fn is_eof(&self) -> bool;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn is_seekable(&self) -> bool;

    /// Releases the underlying resource. Every later operation fails.
    fn close(&mut self);

    /// Reads everything from the current position to the end.
    ///
    /// # Errors
    ///
    /// Fails when the stream is closed.
    fn contents(&mut self) -> Result<String, StreamError>;

    /// Seeks to the start.
    ///
    /// # Errors
    ///
    /// Same as [`seek`](Self::seek).
    fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Renders the whole stream, from the start when seekable.
    ///
    /// Never fails: an unreadable stream renders as the empty string.
    fn stringify(&mut self) -> String {
        if self.is_seekable() && self.rewind().is_err() {
            return String::new();
        }
        self.contents().unwrap_or_default()
    }
}

/// A readable and seekable stream over an in-memory buffer, writable unless
/// made [`read_only`](MemoryStream::read_only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStream {
    buf: BytesMut,
    pos: usize,
    writable: bool,
    closed: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later write fail with [`StreamError::NotWritable`].
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    fn with_buf(buf: BytesMut) -> Self {
        Self { buf, pos: 0, writable: true, closed: false }
    }

    fn ensure_open(&self) -> Result<(), StreamError> {
        if self.closed { Err(StreamError::Closed) } else { Ok(()) }
    }
}

impl BodyStream for MemoryStream {
    fn read(&mut self, len: usize) -> Result<Bytes, StreamError> {
        self.ensure_open()?;
        let end = self.buf.len().min(self.pos.saturating_add(len));
        let chunk = Bytes::copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(chunk)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        self.ensure_open()?;
        if !self.writable {
            return Err(StreamError::NotWritable);
        }
        let overlap = data.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + overlap].copy_from_slice(&data[..overlap]);
        self.buf.extend_from_slice(&data[overlap..]);
        self.pos += data.len();
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.ensure_open()?;
        let (base, offset) = match pos {
            SeekFrom::Start(offset) => (0i128, i128::from(offset)),
            SeekFrom::End(offset) => (self.buf.len() as i128, i128::from(offset)),
            SeekFrom::Current(offset) => (self.pos as i128, i128::from(offset)),
        };
        let target = base + offset;
        if target < 0 || target > self.buf.len() as i128 {
            return Err(StreamError::InvalidSeek { position: target });
        }

        self.pos = usize::try_from(target).map_err(|_overflow| StreamError::InvalidSeek { position: target })?;
        Ok(self.pos as u64)
    }

    fn tell(&self) -> Result<u64, StreamError> {
        self.ensure_open()?;
        Ok(self.pos as u64)
    }

    fn size(&self) -> Option<u64> {
        (!self.closed).then_some(self.buf.len() as u64)
    }

    fn is_eof(&self) -> bool {
        self.closed || self.pos >= self.buf.len()
    }

    fn is_readable(&self) -> bool {
        !self.closed
    }

    fn is_writable(&self) -> bool {
        !self.closed && self.writable
    }

    fn is_seekable(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        self.closed = true;
        self.buf.clear();
        self.pos = 0;
    }

    fn contents(&mut self) -> Result<String, StreamError> {
        self.ensure_open()?;
        let contents = String::from_utf8_lossy(&self.buf[self.pos..]).into_owned();
        self.pos = self.buf.len();
        Ok(contents)
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::with_buf(BytesMut::new())
    }
}

impl From<&str> for MemoryStream {
    fn from(value: &str) -> Self {
        Self::from(value.as_bytes())
    }
}

impl From<String> for MemoryStream {
    fn from(value: String) -> Self {
        Self::from(value.into_bytes())
    }
}

impl From<&[u8]> for MemoryStream {
    fn from(value: &[u8]) -> Self {
        Self::with_buf(BytesMut::from(value))
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(value: Vec<u8>) -> Self {
        Self::with_buf(BytesMut::from(&value[..]))
    }
}

impl From<Bytes> for MemoryStream {
    fn from(value: Bytes) -> Self {
        Self::with_buf(BytesMut::from(&value[..]))
    }
}
