//! Types shared by the transport layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of one resource on a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Host name or IP address; also used as the TLS server name.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Request path, starting with `/`.
    pub path: String,
}

impl ServiceEndpoint {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            path: path.into(),
        }
    }

    /// `host:port`, as used in logs and error messages.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.path)
    }
}

/// How much of a response to read before the session is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Read until the peer closes the connection.
    UntilClose,
    /// Read until the peer closes or `limit` bytes have arrived, whichever comes first.
    Bounded(usize),
}

impl ReadMode {
    pub(crate) fn limit(self) -> usize {
        match self {
            Self::UntilClose => usize::MAX,
            Self::Bounded(limit) => limit,
        }
    }
}
