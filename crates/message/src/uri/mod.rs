//! RFC 3986 URI value type.
//!
//! [`Uri`] parses a URI reference into scheme, user info, host, port, path,
//! query and fragment, normalizes them and renders a canonical string back.
//!
//! # Normalization
//!
//! - scheme and host are stored lowercase
//! - the default port of `http` (80) and `https` (443) is never stored
//! - path, query and fragment are percent-encoded: every byte outside the
//!   component's allowed set is escaped, while existing `%XX` triplets are
//!   kept as they are, so re-encoding is idempotent
//!
//! # Immutability
//!
//! A [`Uri`] never changes after construction. The `with_*` operations return a
//! new value with one component replaced, or the identical instance when the
//! normalized argument matches the current component.

mod encode;
mod impls;
mod parser;
#[allow(clippy::module_inception, reason = "the module is named after its only type")]
mod uri;

#[cfg(test)]
mod test;

pub use uri::Uri;
pub use uri::UriParts;
