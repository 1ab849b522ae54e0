//! Requests, responses and the pieces they share.
//!
//! - [`Message`]: header, version and body access common to both message kinds
//! - [`Request`] / [`RequestBuilder`]: method, [`Uri`](crate::uri::Uri) and request target
//! - [`Response`]: status code and reason phrase
//! - [`BodyStream`] / [`MemoryStream`]: the body capability and its in-memory implementation
//!
//! Every message is a value. Operations named `with_*` or `without_*` consume
//! the message and hand back the updated one, leaving the URI and header
//! storage of any clone untouched.

mod body;
pub use body::BodyStream;
pub use body::MemoryStream;

mod message;
pub use message::Message;
pub use message::MessageParts;

mod request;
pub use request::Request;
pub use request::RequestBuilder;

mod response;
pub use response::Response;
