use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::attestation::AttestationConfig;
use crate::bootstrap::BootstrapConfig;
use crate::poller::PollerConfig;
use crate::transport::{CredentialError, ServerTrust, ServiceEndpoint};
use crate::trip::TripConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub attestation: AttestationConfig,
    #[serde(default)]
    pub trip: TripConfig,
}

/// Client credentials and server trust
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// PEM certificate presented to every service
    #[serde(default = "default_cert_path")]
    pub cert_path: PathBuf,
    /// PEM private key matching `cert_path`
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,
    /// Root certificate used to verify the services. When absent, any server
    /// certificate is accepted.
    #[serde(default)]
    pub ca_path: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: default_cert_path(),
            key_path: default_key_path(),
            ca_path: None,
        }
    }
}

impl TlsConfig {
    /// Server trust derived from `ca_path`.
    pub fn server_trust(&self) -> Result<ServerTrust, CredentialError> {
        match &self.ca_path {
            Some(path) => ServerTrust::from_ca_file(path),
            None => Ok(ServerTrust::AcceptAny),
        }
    }
}

fn default_cert_path() -> PathBuf {
    PathBuf::from("provenance/generate-keys/keys/certificate.pem")
}

fn default_key_path() -> PathBuf {
    PathBuf::from("provenance/generate-keys/keys/private_key.pem")
}

/// Remote services
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub sales: SalesServiceConfig,
    #[serde(default = "default_booking")]
    pub booking: ServiceEndpoint,
    #[serde(default = "default_messaging")]
    pub messaging: ServiceEndpoint,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            sales: SalesServiceConfig::default(),
            booking: default_booking(),
            messaging: default_messaging(),
        }
    }
}

fn default_booking() -> ServiceEndpoint {
    ServiceEndpoint::new("127.0.0.1", 8001, "/api/viagens")
}

fn default_messaging() -> ServiceEndpoint {
    ServiceEndpoint::new("127.0.0.1", 9000, "/send-message")
}

/// Sales service; hosts both the latest-sale listing and the attestation check
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SalesServiceConfig {
    #[serde(default = "default_sales_host")]
    pub host: String,
    #[serde(default = "default_sales_port")]
    pub port: u16,
    #[serde(default = "default_latest_sale_path")]
    pub latest_sale_path: String,
    #[serde(default = "default_attestation_path")]
    pub attestation_path: String,
}

impl Default for SalesServiceConfig {
    fn default() -> Self {
        Self {
            host: default_sales_host(),
            port: default_sales_port(),
            latest_sale_path: default_latest_sale_path(),
            attestation_path: default_attestation_path(),
        }
    }
}

impl SalesServiceConfig {
    pub fn latest_sale_endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint::new(self.host.clone(), self.port, self.latest_sale_path.clone())
    }

    pub fn attestation_endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint::new(self.host.clone(), self.port, self.attestation_path.clone())
    }
}

fn default_sales_host() -> String {
    "127.0.0.1".to_string()
}

fn default_sales_port() -> u16 {
    8000
}

fn default_latest_sale_path() -> String {
    "/api/vendas".to_string()
}

fn default_attestation_path() -> String {
    "/api/system-info".to_string()
}
