//! RFC 7230 header names, values and the header collection carried by messages.
//!
//! - [`HeaderName`]: a validated, case-preserving token
//! - [`IntoHeaderValue`] / [`IntoHeaderValues`]: what may be passed as value(s)
//! - [`HeaderCollection`]: ordered, case-insensitive, copy-on-write storage
//!
//! Values are validated against the `field-value` grammar (visible ASCII,
//! `obs-text`, space and tab) and stored trimmed of leading and trailing
//! space and tab.

mod collection;
mod name;
mod value;

pub use collection::HeaderCollection;
pub use collection::Iter;
pub use name::HeaderName;
pub use value::IntoHeaderValue;
pub use value::IntoHeaderValues;
