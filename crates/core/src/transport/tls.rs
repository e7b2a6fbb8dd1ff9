//! rustls-backed transport.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use super::verifier::AcceptAnyServerCert;
use super::{
    CredentialBundle, CredentialError, HttpRequest, ReadMode, ServerTrust, ServiceEndpoint,
    Session, SessionLease, SessionStats, Transport, TransportError,
};

/// Client TLS configuration carrying this process's identity.
#[derive(Clone)]
pub struct TlsContext {
    config: Arc<ClientConfig>,
}

impl TlsContext {
    /// Loads the certificate and key files and builds the context.
    pub fn initialize(
        cert_path: &Path,
        key_path: &Path,
        trust: ServerTrust,
    ) -> Result<Self, CredentialError> {
        let credentials = CredentialBundle::load(cert_path, key_path)?;
        Self::new(&credentials, trust)
    }

    /// Builds the context from already loaded credentials.
    pub fn new(credentials: &CredentialBundle, trust: ServerTrust) -> Result<Self, CredentialError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()?;

        let builder = match trust {
            ServerTrust::AcceptAny => builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(provider))),
            ServerTrust::Roots(roots) => {
                let mut store = RootCertStore::empty();
                for root in roots {
                    store.add(root)?;
                }
                builder.with_root_certificates(store)
            }
        };

        let config = builder.with_client_auth_cert(
            credentials.certificates().to_vec(),
            credentials.private_key(),
        )?;

        Ok(Self {
            config: Arc::new(config),
        })
    }
}

impl std::fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsContext").finish_non_exhaustive()
    }
}

/// Transport that opens a mutually authenticated TLS session per exchange.
#[derive(Clone)]
pub struct TlsTransport {
    connector: TlsConnector,
    stats: Arc<SessionStats>,
}

impl std::fmt::Debug for TlsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsTransport")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl TlsTransport {
    pub fn new(context: &TlsContext) -> Self {
        Self {
            connector: TlsConnector::from(Arc::clone(&context.config)),
            stats: Arc::new(SessionStats::default()),
        }
    }

    /// Session accounting shared by every session this transport opens.
    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    /// Opens a TCP socket and performs the TLS handshake.
    ///
    /// The session is counted as opened once the socket is connected, so a
    /// handshake failure still releases it.
    pub async fn connect(
        &self,
        endpoint: &ServiceEndpoint,
    ) -> Result<Session<TlsStream<TcpStream>>, TransportError> {
        let server_name = ServerName::try_from(endpoint.host.clone())
            .map_err(|_| TransportError::InvalidServerName(endpoint.host.clone()))?;

        let tcp = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|source| TransportError::Connect {
                endpoint: endpoint.authority(),
                source,
            })?;
        let lease = SessionLease::open(&self.stats);

        match self.connector.connect(server_name, tcp).await {
            Ok(stream) => {
                debug!(endpoint = %endpoint, "TLS session established");
                Ok(Session::new(stream, endpoint.authority(), lease))
            }
            Err(source) => {
                drop(lease);
                warn!(endpoint = %endpoint, "TLS handshake failed: {}", source);
                Err(TransportError::Handshake {
                    endpoint: endpoint.authority(),
                    source,
                })
            }
        }
    }
}

#[async_trait]
impl Transport for TlsTransport {
    fn name(&self) -> &str {
        "tls"
    }

    async fn exchange(
        &self,
        endpoint: &ServiceEndpoint,
        request: &HttpRequest,
        mode: ReadMode,
    ) -> Result<Vec<u8>, TransportError> {
        let bytes = request.to_bytes();
        let mut session = self.connect(endpoint).await?;

        let result = match session.send(&bytes).await {
            Ok(()) => session.receive(mode).await,
            Err(e) => Err(e),
        };

        session.close().await;
        result
    }
}
