//! Core HTTP protocol types of the client.
//!
//! - **Headers** ([`header`]): [`HeaderMap`] keeps headers ordered with their original
//!   spelling, [`HeaderSet`] validates user supplied headers
//! - **Request** ([`request`]): [`RequestSpec`] is the immutable request description,
//!   built through [`RequestSpecBuilder`]; [`Target`] is the parsed url
//! - **Response** ([`response`]): [`Response`] as produced by the decoder
//! - **Errors** ([`error`]):
//!   - [`HttpError`]: top-level error type
//!   - [`RequestError`]: invalid request input
//!   - [`ParseError`]: malformed response
//!   - [`TransportError`]: connect, tls and socket failures

mod header;
pub use header::HeaderMap;
pub use header::HeaderSet;

mod request;
pub use request::DEFAULT_USER_AGENT;
pub use request::RequestSpec;
pub use request::RequestSpecBuilder;
pub use request::Scheme;
pub use request::Target;

mod response;
pub(crate) use response::HEADER_DELIMITER;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::RequestError;
pub use error::TransportError;
