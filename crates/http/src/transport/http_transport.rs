use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, FramedRead};
use tracing::{debug, trace};

use crate::protocol::{HttpError, Target, TransportError};
use crate::transport::{SecureChannel, Stream};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Where to connect and whether the connection needs TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    secure: bool,
}

impl Endpoint {
    pub fn new<S: Into<String>>(host: S, port: u16, secure: bool) -> Self {
        Self { host: host.into(), port, secure }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The host without the brackets of an IPv6 literal, as resolvers and
    /// TLS server names expect it.
    fn connect_host(&self) -> &str {
        self.host.strip_prefix('[').and_then(|host| host.strip_suffix(']')).unwrap_or(&self.host)
    }
}

impl From<&Target> for Endpoint {
    fn from(target: &Target) -> Self {
        Self::new(target.host(), target.port(), target.scheme().is_secure())
    }
}

/// Sends one request per connection and collects the response.
///
/// No timeouts apply: reading only stops when the server closes the
/// connection.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    secure_channel: SecureChannel,
}

impl Transport {
    pub fn new(secure_channel: SecureChannel) -> Self {
        Self { secure_channel }
    }

    /// Opens a connection to `endpoint`, TLS wrapped when the endpoint is secure.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Connecting`] if name resolution or the TCP connect fails
    /// - [`TransportError::Tls`] if the TLS handshake fails
    pub async fn connect(&self, endpoint: &Endpoint) -> Result<Stream, TransportError> {
        let host = endpoint.connect_host();
        let tcp_stream = TcpStream::connect((host, endpoint.port()))
            .await
            .map_err(|e| TransportError::connecting(endpoint.host(), endpoint.port(), e))?;
        debug!(host, port = endpoint.port(), secure = endpoint.is_secure(), "connected");

        if !endpoint.is_secure() {
            return Ok(Stream::Plain(tcp_stream));
        }

        let tls_stream = self.secure_channel.wrap(host, tcp_stream).await?;
        Ok(Stream::Tls(Box::new(tls_stream)))
    }

    /// Writes `raw_request` and returns every byte received until the server
    /// closes the connection.
    ///
    /// # Errors
    ///
    /// Connect and handshake errors as in [`Transport::connect`], and
    /// [`TransportError::Io`] when writing or reading fails.
    pub async fn send(&self, raw_request: &[u8], endpoint: &Endpoint) -> Result<Bytes, TransportError> {
        let mut stream = self.write_request(raw_request, endpoint).await?;

        let mut received = BytesMut::with_capacity(READ_BUFFER_SIZE);
        loop {
            let read = stream.read_buf(&mut received).await?;
            trace!(read, total = received.len(), "received chunk");
            if read == 0 {
                break;
            }
            received.reserve(READ_BUFFER_SIZE);
        }

        debug!(size = received.len(), "connection closed by peer");
        Ok(received.freeze())
    }

    /// Writes `raw_request` and feeds the response to `decoder` chunk by chunk
    /// as it is received, returning the first item the decoder yields.
    ///
    /// # Errors
    ///
    /// Transport errors as in [`Transport::send`], decoder errors converted
    /// into [`HttpError`], and [`TransportError::Closed`] if the decoder yields
    /// nothing before the connection ends.
    pub async fn exchange<D>(&self, raw_request: &[u8], endpoint: &Endpoint, decoder: D) -> Result<D::Item, HttpError>
    where
        D: Decoder,
        HttpError: From<D::Error>,
    {
        let stream = self.write_request(raw_request, endpoint).await?;

        let mut framed_read = FramedRead::with_capacity(stream, decoder, READ_BUFFER_SIZE);
        match framed_read.next().await {
            Some(item) => Ok(item?),
            None => Err(TransportError::Closed.into()),
        }
    }

    async fn write_request(&self, raw_request: &[u8], endpoint: &Endpoint) -> Result<Stream, TransportError> {
        let mut stream = self.connect(endpoint).await?;
        stream.write_all(raw_request).await?;
        stream.flush().await?;
        trace!(size = raw_request.len(), "request written");
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ResponseDecoder;
    use crate::protocol::ParseError;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Accepts one connection, reads the request head and answers with `reply`.
    async fn serve_once(reply: &'static [u8]) -> (SocketAddr, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            for chunk in reply.chunks(7) {
                socket.write_all(chunk).await.unwrap();
                socket.flush().await.unwrap();
            }
            request
        });

        (addr, handle)
    }

    fn endpoint(addr: SocketAddr) -> Endpoint {
        Endpoint::new(addr.ip().to_string(), addr.port(), false)
    }

    #[test]
    fn endpoint_from_target() {
        let target = Target::parse("https://[::1]:8443/").unwrap();
        let endpoint = Endpoint::from(&target);

        assert_eq!(endpoint.host(), "[::1]");
        assert_eq!(endpoint.connect_host(), "::1");
        assert_eq!(endpoint.port(), 8443);
        assert!(endpoint.is_secure());
    }

    #[tokio::test]
    async fn send_reads_until_close() {
        let reply = b"HTTP/1.1 200 OK\r\n\r\nsome body";
        let (addr, server) = serve_once(reply).await;

        let received = Transport::default().send(b"GET / HTTP/1.1\r\n\r\n", &endpoint(addr)).await.unwrap();

        assert_eq!(&received[..], reply);
        assert_eq!(server.await.unwrap(), b"GET / HTTP/1.1\r\n\r\n");
    }

    #[tokio::test]
    async fn exchange_decodes_response() {
        let (addr, _server) = serve_once(b"HTTP/1.1 201 Created\r\nLocation: /items/1\r\n\r\n{}").await;

        let response = Transport::default()
            .exchange(b"POST /items HTTP/1.1\r\n\r\n", &endpoint(addr), ResponseDecoder::new())
            .await
            .unwrap();

        assert_eq!(response.status_code(), 201);
        assert_eq!(response.headers().get("Location"), Some(" /items/1"));
        assert_eq!(&response.body()[..], b"{}");
    }

    #[tokio::test]
    async fn exchange_reports_parse_error() {
        let (addr, _server) = serve_once(b"GARBAGE\r\n\r\n").await;

        let result = Transport::default().exchange(b"GET / HTTP/1.1\r\n\r\n", &endpoint(addr), ResponseDecoder::new()).await;

        assert!(matches!(result, Err(HttpError::ResponseError { source: ParseError::IncorrectStartingLine { .. } })));
    }

    /// Swallows every byte without ever producing a frame.
    struct Discard;

    impl Decoder for Discard {
        type Item = ();
        type Error = ParseError;

        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<()>, ParseError> {
            src.clear();
            Ok(None)
        }
    }

    #[tokio::test]
    async fn exchange_without_item_is_closed() {
        let (addr, _server) = serve_once(b"HTTP/1.1 200 OK\r\n\r\nignored").await;

        let result = Transport::default().exchange(b"GET / HTTP/1.1\r\n\r\n", &endpoint(addr), Discard).await;

        assert!(matches!(result, Err(HttpError::TransportError { source: TransportError::Closed })));
    }

    #[tokio::test]
    async fn connect_refused() {
        // bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();

        let result = Transport::default().send(b"GET / HTTP/1.1\r\n\r\n", &endpoint(addr)).await;

        match result {
            Err(TransportError::Connecting { host, port, .. }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, addr.port());
            }
            other => panic!("expected connecting error, got {other:?}"),
        }
    }
}
