//! Socket handling module
//!
//! This module owns the network side of a request: it opens the TCP
//! connection, optionally wraps it into a TLS session, writes the serialized
//! request and reads the response until the server closes the connection.
//!
//! # Components
//!
//! - [`Transport`]: connects, sends and receives
//! - [`Endpoint`]: where to connect and whether to use TLS
//! - [`SecureChannel`]: turns a TCP stream into a TLS stream
//! - [`Stream`]: a plain or TLS stream behind one read/write contract
//!
//! Every connection serves a single exchange and is dropped afterward, on
//! success and on every error path.

mod http_transport;
mod stream;
mod tls;

pub use http_transport::Endpoint;
pub use http_transport::Transport;
pub use stream::Stream;
pub use tls::SecureChannel;
