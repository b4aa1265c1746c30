//! HTTP request description.
//!
//! A [`RequestSpec`] is assembled once through [`RequestSpecBuilder`] and is
//! read-only afterward. All validation happens in [`RequestSpecBuilder::build`],
//! so encoding a built spec can't fail.

use std::borrow::Cow;

use bytes::Bytes;
use http::{Method, Uri};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::ensure;
use crate::protocol::{HeaderMap, HeaderSet, RequestError};
use crate::utils::{has_line_break, is_latin1};

/// User agent sent when the caller doesn't pick one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Url scheme understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn is_secure(self) -> bool {
        matches!(self, Scheme::Https)
    }
}

/// The parts of a request url the client needs: where to connect and what to
/// put in the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    scheme: Scheme,
    host: String,
    port: u16,
    path_and_query: String,
}

impl Target {
    /// Parses an absolute `http` or `https` url. A url without `://` is read as
    /// `http://<url>`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UrlParsing`] if the url can't be parsed or has no
    /// host, and [`RequestError::UnsupportedScheme`] for any scheme other than
    /// `http` and `https`. Path and query are percent-encoded first, the host is
    /// not, so a space in the host still fails.
    pub fn parse(url: &str) -> Result<Self, RequestError> {
        let absolute = if url.contains("://") { Cow::Borrowed(url) } else { Cow::Owned(format!("http://{url}")) };
        let uri = encode_path(&absolute).parse::<Uri>().map_err(|_| RequestError::url_parsing(url))?;

        let scheme = match uri.scheme_str() {
            Some(s) if s.eq_ignore_ascii_case("http") => Scheme::Http,
            Some(s) if s.eq_ignore_ascii_case("https") => Scheme::Https,
            Some(s) => return Err(RequestError::unsupported_scheme(s)),
            None => return Err(RequestError::url_parsing(url)),
        };

        let host = match uri.host() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(RequestError::url_parsing(url)),
        };

        let port = uri.port_u16().unwrap_or_else(|| scheme.default_port());

        let path_and_query = match uri.path_and_query().map(|pq| pq.as_str()) {
            None | Some("") => "/".to_string(),
            Some(pq) if pq.starts_with('?') => format!("/{pq}"),
            Some(pq) => pq.to_string(),
        };

        Ok(Self { scheme, host, port, path_and_query })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The host as written in the url, IPv6 literals keep their brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path and query as sent in the request line. Chars not allowed there are
    /// percent-encoded as UTF-8, escapes already present are kept.
    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }
}

/// Bytes escaped in the path and query, `%` stays so existing escapes survive.
const PATH: &AsciiSet =
    &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`').add(b'{').add(b'}').add(b'|').add(b'\\').add(b'^');

/// Percent-encodes everything after the authority of an absolute url.
fn encode_path(url: &str) -> Cow<'_, str> {
    let authority = url.find("://").map_or(0, |index| index + 3);
    let Some(split) = url[authority..].find(['/', '?', '#']).map(|index| authority + index) else {
        return Cow::Borrowed(url);
    };

    let (head, tail) = url.split_at(split);
    let encoded: Cow<'_, str> = utf8_percent_encode(tail, PATH).into();
    match encoded {
        Cow::Borrowed(_) => Cow::Borrowed(url),
        Cow::Owned(tail) => Cow::Owned(format!("{head}{tail}")),
    }
}

/// An immutable description of the request to send.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    target: Target,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestSpec {
    pub fn builder() -> RequestSpecBuilder {
        RequestSpecBuilder::new()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The complete header set in wire order: base headers, the headers derived
    /// from the body, then user headers merged over them.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Builder for [`RequestSpec`].
#[derive(Debug)]
pub struct RequestSpecBuilder {
    method: Method,
    url: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
    user_agent: String,
}

impl RequestSpecBuilder {
    fn new() -> Self {
        Self {
            method: Method::GET,
            url: None,
            headers: Vec::new(),
            body: Bytes::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, N, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    pub fn body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the collected parts and freezes them into a [`RequestSpec`].
    ///
    /// # Errors
    ///
    /// - [`RequestError::UrlParsing`] / [`RequestError::UnsupportedScheme`] for a bad url
    /// - [`RequestError::HeaderFormat`] for the first header name outside `[A-Za-z-]+`
    /// - [`RequestError::NonLatin1`] for a header value or user agent with no latin-1 encoding
    /// - [`RequestError::HeaderValue`] for a header value or user agent holding `\r` or `\n`
    pub fn build(self) -> Result<RequestSpec, RequestError> {
        let url = self.url.unwrap_or_default();
        let target = Target::parse(&url)?;
        let user_headers = HeaderSet::parse(self.headers)?;
        ensure!(is_latin1(&self.user_agent), RequestError::non_latin1(&self.user_agent));
        ensure!(!has_line_break(&self.user_agent), RequestError::header_value("User-Agent"));

        let headers = wire_headers(&self.method, &target, &self.user_agent, &self.body, &user_headers);

        Ok(RequestSpec { method: self.method, target, headers, body: self.body })
    }
}

fn wire_headers(method: &Method, target: &Target, user_agent: &str, body: &Bytes, user_headers: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(6 + user_headers.len());
    headers.insert("Host", target.host());
    headers.insert("User-Agent", user_agent);
    headers.insert("Accept", "*/*");
    headers.insert("Connection", "close");

    if *method == Method::POST {
        headers.insert("Content-Length", body.len().to_string());
        headers.insert("Content-Type", mime::TEXT_PLAIN.essence_str());
    }

    headers.merge(user_headers);
    headers
}
