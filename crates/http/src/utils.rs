//! Utility macros and functions for the HTTP client crate.
//!
//! This module provides helper macros and the latin-1 text conversions used
//! on the wire.

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(is_valid_name(name), RequestError::header_format(name));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Returns true if every char of `text` lies in `U+0000..=U+00FF`.
pub(crate) fn is_latin1(text: &str) -> bool {
    text.chars().all(|c| u32::from(c) <= 0xFF)
}

/// Returns true if `text` has a `\r` or `\n`, which would end a header line early.
pub(crate) fn has_line_break(text: &str) -> bool {
    text.contains(['\r', '\n'])
}

/// Appends the latin-1 encoding of `text` to `dst`.
///
/// Chars outside latin-1 are written as `?`; callers validate their input with
/// [`is_latin1`] beforehand.
pub(crate) fn put_latin1(dst: &mut bytes::BytesMut, text: &str) {
    use bytes::BufMut;

    if text.is_ascii() {
        dst.put_slice(text.as_bytes());
        return;
    }

    dst.reserve(text.len());
    for c in text.chars() {
        dst.put_u8(u8::try_from(c).unwrap_or(b'?'));
    }
}

/// Decodes latin-1 bytes, mapping each byte to the char of the same code point.
pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
