//! Ordered header storage shared by requests and responses.
//!
//! Unlike [`http::HeaderMap`], the [`HeaderMap`] here keeps the spelling of header
//! names exactly as written and serializes entries in insertion order, which
//! keeps the bytes on the wire reproducible for the same input.

use crate::ensure;
use crate::protocol::RequestError;
use crate::utils::{has_line_break, is_latin1};

/// An ordered mapping from header name to header value.
///
/// Names are matched ASCII case-insensitively. Writing a name that is already
/// present replaces that entry in place, so the entry keeps the position of the
/// first write while taking the name spelling and value of the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// Inserts a header, returning the previous value if the name was present.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.0 = name;
                Some(std::mem::replace(&mut entry.1, value))
            }
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Merges `other` over `self`: values of `other` win on collision, names new to
    /// `self` are appended in the order of `other`.
    pub fn merge(&mut self, other: &HeaderMap) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

/// Validation of user supplied headers.
#[derive(Debug)]
pub struct HeaderSet;

impl HeaderSet {
    /// Builds a [`HeaderMap`] from user supplied `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// The first pair whose name is not made only of ASCII letters and `-` aborts
    /// with [`RequestError::HeaderFormat`]; a value that has no latin-1 encoding
    /// aborts with [`RequestError::NonLatin1`] and one holding `\r` or `\n` with
    /// [`RequestError::HeaderValue`]. No partial map is returned.
    pub fn parse<I, N, V>(pairs: I) -> Result<HeaderMap, RequestError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs = pairs.into_iter();
        let mut headers = HeaderMap::with_capacity(pairs.size_hint().0);

        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            ensure!(is_valid_name(name), RequestError::header_format(name));
            ensure!(is_latin1(value), RequestError::non_latin1(value));
            ensure!(!has_line_break(value), RequestError::header_value(name));
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-')
}
