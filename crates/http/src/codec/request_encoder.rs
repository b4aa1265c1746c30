//! HTTP request encoder module
//!
//! Serializes a [`RequestSpec`] into the exact bytes sent on the wire:
//!
//! ```text
//! METHOD target HTTP/1.1\r\n
//! Name: Value\r\n        (one line per header)
//! \r\n
//! <body bytes>\r\n\r\n
//! ```
//!
//! The body is passed through untouched, whatever its encoding.

use bytes::{BufMut, Bytes, BytesMut};
use std::io;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::header::HeaderEncoder;
use crate::protocol::RequestSpec;

/// Written after the body.
const TRAILER: &[u8] = b"\r\n\r\n";

/// An encoder for complete HTTP/1.1 requests.
///
/// Encoding a [`RequestSpec`] can't fail; the [`Encoder`] implementation only
/// uses [`io::Error`] because `tokio_util` requires an error type.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    /// Creates a new `RequestEncoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    /// Echo each header to the tracing sink while encoding.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.header_encoder = HeaderEncoder::new(verbose);
        self
    }

    /// Serializes `spec` into a fresh buffer.
    pub fn serialize(&self, spec: &RequestSpec) -> Bytes {
        let mut dst = BytesMut::with_capacity(spec.body().len() + TRAILER.len());
        self.write_request(spec, &mut dst);
        dst.freeze()
    }

    fn write_request(&self, spec: &RequestSpec, dst: &mut BytesMut) {
        self.header_encoder.encode(spec, dst);
        dst.put_slice(spec.body());
        dst.put_slice(TRAILER);
        trace!(request_size = dst.len(), body_size = spec.body().len(), "encoded request");
    }
}

impl Encoder<&RequestSpec> for RequestEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: &RequestSpec, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.write_request(item, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn get_round_trips_through_httparse() {
        let spec = RequestSpec::builder().url("http://example.com/path?x=1").header("X-Test", "v").build().unwrap();

        let raw = RequestEncoder::new().serialize(&spec);

        let mut headers = [httparse::EMPTY_HEADER; 16];
        let mut request = httparse::Request::new(&mut headers);
        let status = request.parse(&raw).unwrap();
        assert!(status.is_complete());

        assert_eq!(request.method, Some("GET"));
        assert_eq!(request.path, Some("/path?x=1"));
        assert_eq!(request.version, Some(1));

        let x_test = request.headers.iter().find(|h| h.name == "X-Test").unwrap();
        assert_eq!(x_test.value, b"v");
        assert!(find(&raw, b"\r\nX-Test: v\r\n").is_some());

        assert!(raw.ends_with(b"\r\n\r\n\r\n\r\n"));
    }

    #[test]
    fn non_ascii_path_is_percent_encoded_on_the_wire() {
        let spec = RequestSpec::builder().url("http://example.com/\u{20ac}uro").build().unwrap();

        let raw = RequestEncoder::new().serialize(&spec);

        assert!(raw.starts_with(b"GET /%E2%82%ACuro HTTP/1.1\r\n"));
        assert!(find(&raw, b"?").is_none());
    }

    #[test]
    fn post_contains_length_and_type() {
        let body = b"name=micro&lang=rust";
        let spec = RequestSpec::builder().method(Method::POST).url("http://example.com/submit").body(Bytes::from_static(body)).build().unwrap();

        let raw = RequestEncoder::new().serialize(&spec);

        assert!(raw.starts_with(b"POST /submit HTTP/1.1\r\n"));
        assert!(find(&raw, format!("Content-Length: {}\r\n", body.len()).as_bytes()).is_some());
        assert!(find(&raw, b"Content-Type: text/plain\r\n").is_some());

        let body_start = find(&raw, b"\r\n\r\n").unwrap() + 4;
        assert_eq!(&raw[body_start..], b"name=micro&lang=rust\r\n\r\n");
    }

    #[test]
    fn post_content_type_override() {
        let spec = RequestSpec::builder()
            .method(Method::POST)
            .url("http://example.com/")
            .body(r#"{"a":1}"#)
            .header("Content-Type", "application/json")
            .build()
            .unwrap();

        let raw = RequestEncoder::new().serialize(&spec);

        assert!(find(&raw, b"Content-Type: application/json\r\n").is_some());
        assert!(find(&raw, b"text/plain").is_none());
    }

    #[test]
    fn binary_body_passes_through() {
        let body: Vec<u8> = (0..=255).collect();
        let spec = RequestSpec::builder().method(Method::POST).url("http://example.com/").body(body.clone()).build().unwrap();

        let raw = RequestEncoder::new().serialize(&spec);

        let body_start = find(&raw, b"\r\n\r\n").unwrap() + 4;
        assert_eq!(&raw[body_start..body_start + body.len()], &body[..]);
        assert!(find(&raw, b"Content-Length: 256\r\n").is_some());
    }

    #[test]
    fn encoder_trait_appends_to_buffer() {
        let spec = RequestSpec::builder().url("http://example.com/").build().unwrap();
        let mut encoder = RequestEncoder::new();

        let mut dst = BytesMut::new();
        encoder.encode(&spec, &mut dst).unwrap();
        encoder.encode(&spec, &mut dst).unwrap();

        let single = encoder.serialize(&spec);
        assert_eq!(dst.len(), single.len() * 2);
    }
}
