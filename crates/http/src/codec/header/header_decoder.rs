//! HTTP header decoder implementation for parsing HTTP response header blocks
//!
//! The decoder receives the header block of a response, that is every byte
//! before the first `\r\n\r\n`, and turns it into a status code and an ordered
//! [`HeaderMap`].
//!
//! # Format
//!
//! - The block is split on `\r\n`
//! - The first line is the status line: `HTTP/1.0` or `HTTP/1.1`, a space, a
//!   three digit status code in `100..=599`, then optionally a space and any
//!   reason text
//! - Every following line is split on its first `:`; the value is the raw
//!   remainder, a leading space included
//!
//! Header text is decoded as latin-1, so decoding never fails on byte values.

use crate::ensure;
use crate::protocol::{HeaderMap, ParseError};
use crate::utils::decode_latin1;

const LINE_SEPARATOR: &[u8] = b"\r\n";

const SUPPORTED_VERSIONS: [&[u8]; 2] = [b"HTTP/1.0 ", b"HTTP/1.1 "];

/// Decoder for the header block of an HTTP/1.x response.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Decodes a header block into its status code and headers.
    ///
    /// # Errors
    ///
    /// - [`ParseError::IncorrectStartingLine`] if the first line is not a valid status line
    /// - [`ParseError::MalformedHeaderLine`] if a header line has no `:` or an empty name
    pub fn decode(&self, header_block: &[u8]) -> Result<(u16, HeaderMap), ParseError> {
        let mut lines = split_lines(header_block);

        // split_lines always yields at least one line
        let status_line = lines.next().unwrap_or_default();
        let status_code = parse_status_line(status_line)?;

        let mut headers = HeaderMap::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }

            let separator = line.iter().position(|b| *b == b':');
            let Some(index) = separator.filter(|index| *index > 0) else {
                return Err(ParseError::malformed_header_line(decode_latin1(line)));
            };

            headers.insert(decode_latin1(&line[..index]), decode_latin1(&line[index + 1..]));
        }

        Ok((status_code, headers))
    }
}

fn split_lines(block: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(block);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.windows(LINE_SEPARATOR.len()).position(|w| w == LINE_SEPARATOR) {
            Some(index) => {
                rest = Some(&current[index + LINE_SEPARATOR.len()..]);
                Some(&current[..index])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

/// Extracts the status code from `HTTP/1.[01] ddd[ reason]`.
fn parse_status_line(line: &[u8]) -> Result<u16, ParseError> {
    let incorrect = || ParseError::incorrect_starting_line(decode_latin1(line));

    let rest = SUPPORTED_VERSIONS.iter().find_map(|version| line.strip_prefix(*version)).ok_or_else(incorrect)?;

    let (code, reason) = rest.split_at_checked(3).ok_or_else(incorrect)?;
    ensure!(code.iter().all(u8::is_ascii_digit), incorrect());
    ensure!(reason.is_empty() || reason[0] == b' ', incorrect());

    let status_code = code.iter().fold(0u16, |acc, digit| acc * 10 + u16::from(digit - b'0'));
    ensure!((100..=599).contains(&status_code), incorrect());

    Ok(status_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_status_and_headers() {
        let (status_code, headers) = HeaderDecoder.decode(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nX-Empty:").unwrap();

        assert_eq!(status_code, 200);
        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("Content-Type", " text/plain"), ("X-Empty", "")]);
    }

    #[test]
    fn value_keeps_everything_after_first_colon() {
        let (_, headers) = HeaderDecoder.decode(b"HTTP/1.0 302 Found\r\nLocation: http://example.com:8080/").unwrap();
        assert_eq!(headers.get("location"), Some(" http://example.com:8080/"));
    }

    #[test]
    fn duplicate_names_overwrite() {
        let (_, headers) = HeaderDecoder.decode(b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Set-Cookie"), Some(" b=2"));
    }

    #[test]
    fn status_line_variants() {
        let cases: [(&[u8], u16); 4] = [
            (b"HTTP/1.1 404 Not Found", 404),
            (b"HTTP/1.0 500", 500),
            (b"HTTP/1.1 100 Continue", 100),
            (b"HTTP/1.1 599 Custom reason, with punctuation!", 599),
        ];
        for (line, code) in cases {
            assert_eq!(parse_status_line(line).unwrap(), code);
        }
    }

    #[test]
    fn incorrect_status_lines() {
        let lines: [&[u8]; 9] = [
            b"GARBAGE",
            b"",
            b"HTTP/2 200 OK",
            b"HTTP/1.1 20 OK",
            b"HTTP/1.1 2000",
            b"HTTP/1.1 abc OK",
            b"HTTP/1.1 099 Too Low",
            b"HTTP/1.1 600 Too High",
            b"http/1.1 200 OK",
        ];
        for line in lines {
            match parse_status_line(line) {
                Err(ParseError::IncorrectStartingLine { line: reported }) => assert_eq!(reported.as_bytes(), line),
                other => panic!("expected incorrect starting line for {line:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn header_line_without_colon() {
        let result = HeaderDecoder.decode(b"HTTP/1.1 200 OK\r\nBroken header line");
        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { line }) if line == "Broken header line"));

        let result = HeaderDecoder.decode(b"HTTP/1.1 200 OK\r\n: no name");
        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[test]
    fn latin1_header_value() {
        let (_, headers) = HeaderDecoder.decode(b"HTTP/1.1 200 OK\r\nX-Name: J\xfcrgen").unwrap();
        assert_eq!(headers.get("X-Name"), Some(" J\u{fc}rgen"));
    }
}
