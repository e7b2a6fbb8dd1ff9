//! Error types for the transport module.

use thiserror::Error;

/// Errors that can occur during one request/response exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP connection could not be established.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The endpoint host is not usable as a TLS server name.
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// The TLS handshake did not complete.
    #[error("TLS handshake with {endpoint} failed: {source}")]
    Handshake {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the request failed.
    #[error("failed to send request to {endpoint}: {source}")]
    Write {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection failed after the response had started arriving.
    #[error("connection to {endpoint} dropped after {received} bytes: {source}")]
    ReadInterrupted {
        endpoint: String,
        received: usize,
        #[source]
        source: std::io::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TransportError {
    /// Whether the failure happened before a session was established.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. } | Self::InvalidServerName(_) | Self::Handshake { .. }
        )
    }
}
