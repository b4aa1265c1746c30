//! The request/response cycle.
//!
//! [`Client::execute`] serializes a [`RequestSpec`], sends it through the
//! [`Transport`] and decodes the reply with the [`ResponseDecoder`]. Every
//! failure is returned as an [`HttpError`]; nothing here terminates the process.

use tracing::debug;

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::protocol::{HttpError, RequestSpec, Response};
use crate::transport::{Endpoint, SecureChannel, Transport};

#[derive(Debug, Clone, Default)]
pub struct Client {
    transport: Transport,
    encoder: RequestEncoder,
}

impl Client {
    pub fn new() -> Self {
        Default::default()
    }

    /// Use `secure_channel` for `https` targets.
    pub fn secure_channel(mut self, secure_channel: SecureChannel) -> Self {
        self.transport = Transport::new(secure_channel);
        self
    }

    /// Echo the request headers to the tracing sink while serializing.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.encoder = self.encoder.verbose(verbose);
        self
    }

    /// Performs one request and waits for the complete response.
    ///
    /// # Errors
    ///
    /// - [`HttpError::TransportError`] if connecting, the TLS handshake or socket io fails
    /// - [`HttpError::ResponseError`] if the reply is not a valid HTTP/1.x response
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Response, HttpError> {
        let raw_request = self.encoder.serialize(spec);
        let endpoint = Endpoint::from(spec.target());
        debug!(method = %spec.method(), host = endpoint.host(), port = endpoint.port(), "sending request");

        let response = self.transport.exchange(&raw_request, &endpoint, ResponseDecoder::new()).await?;
        debug!(status_code = response.status_code(), body_size = response.body().len(), "received response");
        Ok(response)
    }
}
