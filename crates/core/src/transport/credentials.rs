//! Client identity and server trust material.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors raised while loading TLS credentials. These are startup errors.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// A credential file does not exist.
    #[error("Credential file not found: {path}")]
    Missing { path: PathBuf },

    /// A credential file exists but could not be read.
    #[error("Failed to read credential file: {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The PEM input could not be decoded.
    #[error("Malformed PEM input: {0}")]
    Malformed(#[source] io::Error),

    /// The certificate input holds no certificate.
    #[error("No certificate found in PEM input")]
    NoCertificate,

    /// The key input holds no private key.
    #[error("No private key found in PEM input")]
    NoPrivateKey,

    /// rustls refused the material (e.g. key does not match certificate).
    #[error("TLS context rejected credentials: {0}")]
    Tls(#[from] rustls::Error),
}

/// Certificate chain and private key presented to the remote services.
pub struct CredentialBundle {
    certificates: Vec<CertificateDer<'static>>,
    private_key: PrivateKeyDer<'static>,
}

impl CredentialBundle {
    /// Decodes a PEM certificate chain and a PEM private key.
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, CredentialError> {
        let certificates = parse_certificates(cert_pem)?;
        let private_key = rustls_pemfile::private_key(&mut &key_pem[..])
            .map_err(CredentialError::Malformed)?
            .ok_or(CredentialError::NoPrivateKey)?;

        Ok(Self {
            certificates,
            private_key,
        })
    }

    /// Reads and decodes the certificate and key files.
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self, CredentialError> {
        let cert_pem = read_credential_file(cert_path)?;
        let key_pem = read_credential_file(key_path)?;
        Self::from_pem(&cert_pem, &key_pem)
    }

    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certificates
    }

    pub(crate) fn private_key(&self) -> PrivateKeyDer<'static> {
        self.private_key.clone_key()
    }

    /// SHA-256 of the leaf certificate (DER), lowercase hex.
    pub fn fingerprint(&self) -> String {
        format!("{:x}", Sha256::digest(self.certificates[0].as_ref()))
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("certificates", &self.certificates.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// How the remote services' certificates are checked.
#[derive(Debug, Clone)]
pub enum ServerTrust {
    /// Accept any server certificate (self-signed service deployments).
    AcceptAny,
    /// Verify servers against these root certificates.
    Roots(Vec<CertificateDer<'static>>),
}

impl ServerTrust {
    pub fn from_ca_pem(pem: &[u8]) -> Result<Self, CredentialError> {
        Ok(Self::Roots(parse_certificates(pem)?))
    }

    pub fn from_ca_file(path: &Path) -> Result<Self, CredentialError> {
        Self::from_ca_pem(&read_credential_file(path)?)
    }
}

fn parse_certificates(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, CredentialError> {
    let certificates = rustls_pemfile::certs(&mut &pem[..])
        .collect::<Result<Vec<_>, _>>()
        .map_err(CredentialError::Malformed)?;
    if certificates.is_empty() {
        return Err(CredentialError::NoCertificate);
    }
    Ok(certificates)
}

fn read_credential_file(path: &Path) -> Result<Vec<u8>, CredentialError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CredentialError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            CredentialError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CLIENT_CERT: &[u8] = include_bytes!("../../tests/fixtures/client.pem");
    const CLIENT_KEY: &[u8] = include_bytes!("../../tests/fixtures/client.key");
    const CA_CERT: &[u8] = include_bytes!("../../tests/fixtures/ca.pem");

    #[test]
    fn test_from_pem() {
        let bundle = CredentialBundle::from_pem(CLIENT_CERT, CLIENT_KEY).unwrap();
        assert_eq!(bundle.certificates().len(), 1);
        assert_eq!(bundle.fingerprint().len(), 64);
    }

    #[test]
    fn test_missing_certificate() {
        let err = CredentialBundle::from_pem(b"", CLIENT_KEY).unwrap_err();
        assert!(matches!(err, CredentialError::NoCertificate));
    }

    #[test]
    fn test_missing_private_key() {
        let err = CredentialBundle::from_pem(CLIENT_CERT, CLIENT_CERT).unwrap_err();
        assert!(matches!(err, CredentialError::NoPrivateKey));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CredentialBundle::load(
            Path::new("/nonexistent/certificate.pem"),
            Path::new("/nonexistent/private_key.pem"),
        )
        .unwrap_err();
        assert!(matches!(err, CredentialError::Missing { .. }));
        assert_eq!(
            err.to_string(),
            "Credential file not found: /nonexistent/certificate.pem"
        );
    }

    #[test]
    fn test_load_from_files() {
        let mut cert = NamedTempFile::new().unwrap();
        cert.write_all(CLIENT_CERT).unwrap();
        let mut key = NamedTempFile::new().unwrap();
        key.write_all(CLIENT_KEY).unwrap();

        let bundle = CredentialBundle::load(cert.path(), key.path()).unwrap();
        let from_memory = CredentialBundle::from_pem(CLIENT_CERT, CLIENT_KEY).unwrap();
        assert_eq!(bundle.fingerprint(), from_memory.fingerprint());
    }

    #[test]
    fn test_debug_redacts_key() {
        let bundle = CredentialBundle::from_pem(CLIENT_CERT, CLIENT_KEY).unwrap();
        let debug = format!("{:?}", bundle);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("PRIVATE"));
    }

    #[test]
    fn test_server_trust_from_ca() {
        match ServerTrust::from_ca_pem(CA_CERT).unwrap() {
            ServerTrust::Roots(roots) => assert_eq!(roots.len(), 1),
            ServerTrust::AcceptAny => panic!("expected roots"),
        }
    }
}
