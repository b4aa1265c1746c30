//! A minimal asynchronous HTTP/1.1 client
//!
//! This crate sends a single request per connection over plain TCP or TLS and
//! reads the response until the server closes the connection. It is the
//! library behind the `micro-curl` command line tool.
//!
//! # Features
//!
//! - HTTP/1.1 requests with `Connection: close`
//! - Ordered, case-insensitive header handling with user overrides
//! - TLS through rustls with webpki roots, verification on by default
//! - Incremental response decoding with `tokio_util` codecs
//! - Errors returned as values, never a process exit
//!
//! # Example
//!
//! ```no_run
//! use http::Method;
//! use micro_http_client::client::Client;
//! use micro_http_client::protocol::{HttpError, RequestSpec};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), HttpError> {
//!     let spec = RequestSpec::builder()
//!         .method(Method::POST)
//!         .url("http://127.0.0.1:8080/submit")
//!         .header("Content-Type", "application/json")
//!         .body(r#"{"name":"micro"}"#)
//!         .build()?;
//!
//!     let response = Client::new().execute(&spec).await?;
//!     println!("{} {:?}", response.status_code(), response.body());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request description, response, headers and errors
//! - [`codec`]: request serialization and response decoding
//! - [`transport`]: TCP and TLS connections
//! - [`client`]: ties the three together for one request/response cycle
//!
//! # Limitations
//!
//! - No redirects, cookies, proxies, keep-alive or chunked decoding
//! - No timeouts: a server that never closes the connection blocks forever
//! - The whole response is buffered in memory

pub mod client;
pub mod codec;
pub mod protocol;
pub mod transport;

mod utils;
pub(crate) use utils::ensure;
