//! HTTP header processing for the client side of the wire
//!
//! # Components
//!
//! - [`HeaderEncoder`]: Encodes the request line and request headers to bytes
//!   - Latin-1 text encoding, one byte per char
//!   - Headers written in the order of the [`HeaderMap`](crate::protocol::HeaderMap)
//!   - Optional echo of each header to the tracing sink
//!
//! - [`HeaderDecoder`]: Decodes a response header block
//!   - Status line validation (`HTTP/1.0` or `HTTP/1.1`, three digit code)
//!   - Header lines split on the first `:`, values kept raw

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
