//! TLS client sessions on top of tokio-rustls.
//!
//! Certificates are checked against the bundled webpki roots unless the
//! channel is explicitly created as insecure.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tracing::{debug, warn};

use crate::protocol::TransportError;

/// Wraps TCP streams into TLS client sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureChannel {
    insecure: bool,
}

impl SecureChannel {
    /// A channel verifying the server certificate and host name.
    pub fn new() -> Self {
        Default::default()
    }

    /// A channel accepting any server certificate.
    pub fn insecure() -> Self {
        Self { insecure: true }
    }

    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    /// Performs the TLS handshake for `host` over `tcp_stream`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Tls`] if `host` is not a valid server name or
    /// the handshake fails.
    pub async fn wrap(&self, host: &str, tcp_stream: TcpStream) -> Result<TlsStream<TcpStream>, TransportError> {
        let config = self.client_config().map_err(|e| TransportError::tls(host, e))?;
        let server_name = ServerName::try_from(host.to_string()).map_err(|e| TransportError::tls(host, e))?;

        let stream = TlsConnector::from(Arc::new(config))
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| TransportError::tls(host, e))?;

        debug!(host, insecure = self.insecure, "tls handshake finished");
        Ok(stream)
    }

    fn client_config(&self) -> Result<ClientConfig, rustls::Error> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let builder = ClientConfig::builder_with_provider(Arc::clone(&provider)).with_safe_default_protocol_versions()?;

        if self.insecure {
            warn!("tls certificate verification disabled");
            let verifier = Arc::new(NoVerification(provider));
            return Ok(builder.dangerous().with_custom_certificate_verifier(verifier).with_no_client_auth());
        }

        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Ok(builder.with_root_certificates(roots).with_no_client_auth())
    }
}

/// Accepts every certificate but still checks handshake signatures.
#[derive(Debug)]
struct NoVerification(Arc<CryptoProvider>);

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
