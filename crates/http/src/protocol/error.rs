use std::io;
use thiserror::Error;

/// Any failure of a request/response cycle.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: RequestError,
    },

    #[error("transport error: {source}")]
    TransportError {
        #[from]
        source: TransportError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: ParseError,
    },
}

/// Errors raised while building a request, before any network activity.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid header name `{name}`, only letters and `-` are allowed")]
    HeaderFormat { name: String },

    #[error("value `{value}` can't be encoded as latin-1")]
    NonLatin1 { value: String },

    #[error("value of header `{name}` contains a line break")]
    HeaderValue { name: String },

    #[error("can't parse url `{url}`")]
    UrlParsing { url: String },

    #[error("unsupported url scheme `{scheme}`")]
    UnsupportedScheme { scheme: String },
}

impl RequestError {
    pub fn header_format<S: ToString>(name: S) -> Self {
        Self::HeaderFormat { name: name.to_string() }
    }

    pub fn non_latin1<S: ToString>(value: S) -> Self {
        Self::NonLatin1 { value: value.to_string() }
    }

    pub fn header_value<S: ToString>(name: S) -> Self {
        Self::HeaderValue { name: name.to_string() }
    }

    pub fn url_parsing<S: ToString>(url: S) -> Self {
        Self::UrlParsing { url: url.to_string() }
    }

    pub fn unsupported_scheme<S: ToString>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.to_string() }
    }
}

/// Errors raised while decoding a response.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("incorrect starting line: {line:?}")]
    IncorrectStartingLine { line: String },

    #[error("malformed header line, missing `:` separator: {line:?}")]
    MalformedHeaderLine { line: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn incorrect_starting_line<S: ToString>(line: S) -> Self {
        Self::IncorrectStartingLine { line: line.to_string() }
    }

    pub fn malformed_header_line<S: ToString>(line: S) -> Self {
        Self::MalformedHeaderLine { line: line.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("can't connect to {host}:{port}: {source}")]
    Connecting {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("tls handshake with {host} failed: {reason}")]
    Tls { host: String, reason: String },

    #[error("connection closed before a response was received")]
    Closed,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl TransportError {
    pub fn connecting<S: ToString>(host: S, port: u16, source: io::Error) -> Self {
        Self::Connecting { host: host.to_string(), port, source }
    }

    pub fn tls<S: ToString, R: ToString>(host: S, reason: R) -> Self {
        Self::Tls { host: host.to_string(), reason: reason.to_string() }
    }
}
