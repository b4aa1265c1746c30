//! Command line arguments of `micro-curl`.
//!
//! ```bash
//! micro-curl -X POST -H "Content-Type: application/json" -d '{"a":1}' http://127.0.0.1:8080/items
//! MICRO_CURL_USER_AGENT=probe/1.0 micro-curl -i -o page.html https://example.com/
//! ```

use std::path::PathBuf;

use bytes::Bytes;
use clap::Parser;
use http::Method;
use micro_http_client::protocol::{DEFAULT_USER_AGENT, RequestError, RequestSpec};

#[derive(Debug, Clone, Parser)]
#[command(name = "micro-curl", version, about = "Send a single HTTP/1.1 request and print the response body")]
pub struct Args {
    /// Url to request, `http://` is assumed when no scheme is given
    #[arg(value_name = "URL")]
    pub url: String,

    /// Request method
    #[arg(short = 'X', long = "request", value_name = "METHOD", default_value = "GET", value_parser = parse_method)]
    pub method: Method,

    /// Extra header, may be repeated; overrides the default header of the same name
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body, encoded as latin-1
    #[arg(short = 'd', long = "data", value_name = "TEXT", conflicts_with = "upload_file")]
    pub data: Option<String>,

    /// Read the request body from a file
    #[arg(short = 'T', long = "upload-file", value_name = "PATH")]
    pub upload_file: Option<PathBuf>,

    /// Write the output to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write the response header block before the body
    #[arg(short = 'i', long = "include")]
    pub include: bool,

    /// Value of the User-Agent header
    #[arg(short = 'A', long = "user-agent", value_name = "NAME", default_value = DEFAULT_USER_AGENT, env = "MICRO_CURL_USER_AGENT")]
    pub user_agent: String,

    /// Log the request headers and connection details to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Skip TLS certificate and host name verification
    #[arg(short = 'k', long = "insecure")]
    pub insecure: bool,
}

impl Args {
    /// The `--data` text as latin-1 bytes, empty without `--data`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NonLatin1`] if the text has chars above `U+00FF`.
    pub fn data_bytes(&self) -> Result<Bytes, RequestError> {
        let Some(data) = &self.data else {
            return Ok(Bytes::new());
        };

        data.chars()
            .map(u8::try_from)
            .collect::<Result<Vec<u8>, _>>()
            .map(Bytes::from)
            .map_err(|_| RequestError::non_latin1(data))
    }

    /// Assembles the request from the arguments and the already read `body`.
    ///
    /// # Errors
    ///
    /// Any [`RequestError`] raised by [`RequestSpec`] validation.
    pub fn request_spec(&self, body: Bytes) -> Result<RequestSpec, RequestError> {
        RequestSpec::builder()
            .method(self.method.clone())
            .url(self.url.as_str())
            .headers(self.headers.iter().cloned())
            .body(body)
            .user_agent(self.user_agent.as_str())
            .build()
    }
}

fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes()).map_err(|e| format!("invalid method `{s}`: {e}"))
}

/// Splits `Name: Value` on the first `:`. Leading whitespace of the value is
/// dropped, the name is checked later by the request builder.
fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s.split_once(':').ok_or_else(|| format!("header `{s}` must look like `Name: Value`"))?;
    Ok((name.to_string(), value.trim_start().to_string()))
}
