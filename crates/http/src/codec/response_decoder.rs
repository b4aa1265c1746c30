//! HTTP response decoder module
//!
//! This module decodes a raw HTTP/1.x response as it arrives from the socket.
//! The response has no usable framing for this client (no keep-alive, the
//! server closes the connection), so the decoder collects bytes until the end
//! of the stream and only then yields the [`Response`].
//!
//! # State Machine
//!
//! - `Header`: searching for the `\r\n\r\n` delimiter. The position reached by
//!   the previous search is remembered, and the next search starts three bytes
//!   before it so a delimiter split across two reads is still found
//! - `Body`: the header block is decoded, every further byte belongs to the body
//! - `Done`: the response has been produced
//!
//! # Example
//!
//! ```
//! use micro_http_client::codec::ResponseDecoder;
//!
//! let response = ResponseDecoder::parse(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello").unwrap();
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.headers().get("Content-Type"), Some(" text/plain"));
//! assert_eq!(&response.body()[..], b"hello");
//! ```

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::header::HeaderDecoder;
use crate::protocol::{HEADER_DELIMITER, HeaderMap, ParseError, Response};

/// A decoded header block waiting for the rest of the body.
#[derive(Debug)]
struct Head {
    status_code: u16,
    headers: HeaderMap,
    raw_headers: Bytes,
}

#[derive(Debug)]
enum State {
    Header { scanned: usize },
    Body { head: Head, body: BytesMut },
    Done,
}

/// A decoder for HTTP responses delimited by the end of the stream.
///
/// [`Decoder::decode`] never yields an item; it only advances the state
/// machine. [`Decoder::decode_eof`] yields the complete [`Response`] once.
#[derive(Debug)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    state: State,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    /// Decodes a complete raw response.
    ///
    /// # Errors
    ///
    /// - [`ParseError::IncorrectStartingLine`] if the status line is invalid
    /// - [`ParseError::MalformedHeaderLine`] if a header line has no `:`
    pub fn parse(raw: &[u8]) -> Result<Response, ParseError> {
        let mut decoder = Self::new();
        let mut src = BytesMut::from(raw);
        decoder.decode_eof(&mut src)?.ok_or_else(|| ParseError::incorrect_starting_line(""))
    }

    fn decode_head(&self, raw_headers: Bytes) -> Result<Head, ParseError> {
        let (status_code, headers) = self.header_decoder.decode(&raw_headers)?;
        trace!(status_code, header_size = raw_headers.len(), header_count = headers.len(), "parsed response header");
        Ok(Head { status_code, headers, raw_headers })
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self { header_decoder: HeaderDecoder, state: State::Header { scanned: 0 } }
    }
}

impl Decoder for ResponseDecoder {
    type Item = Response;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match &mut self.state {
            State::Header { scanned } => {
                let from = scanned.saturating_sub(HEADER_DELIMITER.len() - 1);
                let Some(index) = find_delimiter(&src[from..]).map(|index| index + from) else {
                    *scanned = src.len();
                    return Ok(None);
                };

                let raw_headers = src.split_to(index).freeze();
                src.advance(HEADER_DELIMITER.len());
                let head = self.decode_head(raw_headers)?;
                self.state = State::Body { head, body: src.split() };
            }
            State::Body { body, .. } => {
                body.extend_from_slice(src);
                src.clear();
            }
            State::Done => src.clear(),
        }

        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.decode(src)?;

        let response = match std::mem::replace(&mut self.state, State::Done) {
            State::Header { .. } => {
                // the peer closed before sending the delimiter, everything is header
                let head = self.decode_head(src.split().freeze())?;
                Response::new(head.status_code, head.headers, head.raw_headers, Bytes::new())
            }
            State::Body { head, body } => Response::new(head.status_code, head.headers, head.raw_headers, body.freeze()),
            State::Done => return Ok(None),
        };

        trace!(status_code = response.status_code(), body_size = response.body().len(), "decoded response");
        Ok(Some(response))
    }
}

fn find_delimiter(bytes: &[u8]) -> Option<usize> {
    bytes.windows(HEADER_DELIMITER.len()).position(|window| window == HEADER_DELIMITER)
}
