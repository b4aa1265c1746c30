//! HTTP codec module for encoding requests and decoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestEncoder`]: Serializes a [`RequestSpec`](crate::protocol::RequestSpec)
//!   - Request line and headers via the [`header`] module
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: Decodes a raw response into a [`Response`](crate::protocol::Response)
//!   - Status line and header lines via the [`header`] module
//!
//! # Example
//!
//! ```
//! use micro_http_client::codec::{RequestEncoder, ResponseDecoder};
//! use micro_http_client::protocol::RequestSpec;
//!
//! let spec = RequestSpec::builder().url("http://example.com/").build().unwrap();
//! let raw_request = RequestEncoder::new().serialize(&spec);
//! assert!(raw_request.starts_with(b"GET / HTTP/1.1\r\n"));
//!
//! let response = ResponseDecoder::parse(b"HTTP/1.1 204 No Content\r\n\r\n").unwrap();
//! assert_eq!(response.status_code(), 204);
//! ```
//!
//! Both types also implement the `tokio_util` codec traits, so they plug into
//! `FramedWrite` and `FramedRead`.

pub mod header;
mod request_encoder;
mod response_decoder;

pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
