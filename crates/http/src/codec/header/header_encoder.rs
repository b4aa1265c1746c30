//! HTTP header encoder implementation for serializing HTTP request heads
//!
//! This module writes the request line and the request headers of a
//! [`RequestSpec`] into raw bytes, terminated by the empty line that separates
//! the head from the body.
//!
//! Text is written as latin-1: every char becomes the single byte of the same
//! code point. [`RequestSpec`] construction already rejected anything that
//! can't be encoded this way, so encoding never fails.

use bytes::{BufMut, BytesMut};
use tracing::info;

use crate::protocol::RequestSpec;
use crate::utils::put_latin1;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for the head of an HTTP/1.1 request.
///
/// With `verbose` set, each header is also reported through [`tracing`] as
/// `-> Name: Value` while it is written. The produced bytes don't change.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder {
    verbose: bool,
}

impl HeaderEncoder {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Writes `METHOD target HTTP/1.1\r\n`, every header as `Name: Value\r\n`
    /// and the closing `\r\n` into `dst`.
    pub fn encode(&self, spec: &RequestSpec, dst: &mut BytesMut) {
        dst.reserve(INIT_HEADER_SIZE);

        dst.put_slice(spec.method().as_str().as_bytes());
        dst.put_u8(b' ');
        put_latin1(dst, spec.target().path_and_query());
        dst.put_slice(b" HTTP/1.1\r\n");

        for (name, value) in spec.headers().iter() {
            if self.verbose {
                info!("-> {}: {}", name, value);
            }
            put_latin1(dst, name);
            dst.put_slice(b": ");
            put_latin1(dst, value);
            dst.put_slice(b"\r\n");
        }

        dst.put_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn encode_get_head() {
        let spec = RequestSpec::builder().url("http://127.0.0.1:8080/index.html").user_agent("curl/7.79.1").build().unwrap();

        let mut dst = BytesMut::new();
        HeaderEncoder::default().encode(&spec, &mut dst);

        let expected = concat!(
            "GET /index.html HTTP/1.1\r\n",
            "Host: 127.0.0.1\r\n",
            "User-Agent: curl/7.79.1\r\n",
            "Accept: */*\r\n",
            "Connection: close\r\n",
            "\r\n",
        );
        assert_eq!(&dst[..], expected.as_bytes());
    }

    #[test]
    fn encode_latin1_value() {
        let spec = RequestSpec::builder()
            .method(Method::PUT)
            .url("http://example.com/")
            .header("X-Name", "J\u{fc}rgen")
            .build()
            .unwrap();

        let mut dst = BytesMut::new();
        HeaderEncoder::default().encode(&spec, &mut dst);

        let needle: &[u8] = b"X-Name: J\xfcrgen\r\n";
        assert!(dst.windows(needle.len()).any(|w| w == needle));
        assert!(dst.starts_with(b"PUT / HTTP/1.1\r\n"));
    }

    #[test]
    fn verbose_does_not_change_bytes() {
        let spec = RequestSpec::builder().url("http://example.com/a?b=c").header("X-Test", "v").build().unwrap();

        let mut quiet = BytesMut::new();
        HeaderEncoder::new(false).encode(&spec, &mut quiet);
        let mut verbose = BytesMut::new();
        HeaderEncoder::new(true).encode(&spec, &mut verbose);

        assert_eq!(quiet, verbose);
    }
}
