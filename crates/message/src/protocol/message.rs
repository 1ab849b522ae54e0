//! State and behavior shared by requests and responses.

use http::Version;
use tracing::trace;

use crate::error::Rejected;
use crate::header::{HeaderCollection, IntoHeaderValues};

/// The `{version, headers, body}` part every message carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParts<B> {
    pub(crate) version: Version,
    pub(crate) headers: HeaderCollection,
    pub(crate) body: B,
}

impl<B> MessageParts<B> {
    pub(crate) fn new(headers: HeaderCollection, body: B) -> Self {
        Self { version: Version::HTTP_11, headers, body }
    }

    pub(crate) fn map_body<T, F: FnOnce(B) -> T>(self, f: F) -> MessageParts<T> {
        MessageParts { version: self.version, headers: self.headers, body: f(self.body) }
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn headers(&self) -> &HeaderCollection {
        &self.headers
    }

    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }
}

mod sealed {
    pub trait Sealed {
        type Body;

        fn parts(&self) -> &super::MessageParts<Self::Body>;

        fn parts_mut(&mut self) -> &mut super::MessageParts<Self::Body>;
    }
}

pub(crate) use sealed::Sealed;

/// Header, version and body access common to [`Request`](super::Request) and
/// [`Response`](super::Response).
///
/// The `with_*` operations consume the message and return the updated one, so
/// no other holder can ever observe a message change. Keep a clone around when
/// the previous value is still needed.
pub trait Message: sealed::Sealed + Sized {
    /// Protocol version, `HTTP/1.1` unless set otherwise.
    fn version(&self) -> Version {
        self.parts().version
    }

    fn headers(&self) -> &HeaderCollection {
        &self.parts().headers
    }

    /// Case-insensitive header existence check.
    fn has_header(&self, name: &str) -> bool {
        self.parts().headers.has(name)
    }

    /// Values of a header, empty when absent.
    fn header(&self, name: &str) -> &[String] {
        self.parts().headers.get(name)
    }

    /// Values of a header joined with `", "`.
    fn header_line(&self, name: &str) -> String {
        self.parts().headers.get_line(name)
    }

    fn body(&self) -> &Self::Body {
        &self.parts().body
    }

    fn into_body(self) -> Self::Body;

    #[must_use]
    fn with_version(mut self, version: Version) -> Self {
        if self.parts().version != version {
            self.parts_mut().version = version;
        }
        self
    }

    /// Replaces every value of `name`, see [`HeaderCollection::with_header`].
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] for an invalid name or value, holding the unchanged message.
    fn with_header<V: IntoHeaderValues>(mut self, name: &str, value: V) -> Result<Self, Rejected<Self>> {
        match self.parts().headers.with_header(name, value) {
            Ok(headers) => {
                self.parts_mut().headers = headers;
                Ok(self)
            }
            Err(e) => Err(Rejected::new(self, e)),
        }
    }

    /// Appends to the values of `name`, see [`HeaderCollection::with_added_header`].
    ///
    /// # Errors
    ///
    /// Same as [`with_header`](Self::with_header).
    fn with_added_header<V: IntoHeaderValues>(mut self, name: &str, value: V) -> Result<Self, Rejected<Self>> {
        match self.parts().headers.with_added_header(name, value) {
            Ok(headers) => {
                self.parts_mut().headers = headers;
                Ok(self)
            }
            Err(e) => Err(Rejected::new(self, e)),
        }
    }

    #[must_use]
    fn without_header(mut self, name: &str) -> Self {
        let headers = self.parts().headers.without_header(name);
        if !HeaderCollection::ptr_eq(&headers, &self.parts().headers) {
            trace!(header = name, "remove header");
            self.parts_mut().headers = headers;
        }
        self
    }

    /// Replaces the body with another one of the same type.
    #[must_use]
    fn with_body(mut self, body: Self::Body) -> Self {
        self.parts_mut().body = body;
        self
    }
}
