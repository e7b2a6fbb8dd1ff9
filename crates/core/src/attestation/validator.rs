//! Attestation request and verdict.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::transport::{response_body, HttpRequest, ReadMode, ServiceEndpoint, Transport};

use super::AttestationConfig;

/// Why an attestation attempt did not pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// The reply did not contain the acceptance marker.
    MarkerMissing,
    /// The service closed the session without replying.
    EmptyResponse,
    /// The exchange itself failed.
    Transport(String),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MarkerMissing => f.write_str("acceptance marker not found in reply"),
            Self::EmptyResponse => f.write_str("empty reply"),
            Self::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

/// Result of one attestation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationVerdict {
    Accepted,
    Rejected(RejectionReason),
}

impl AttestationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Submits the system descriptor and checks the reply for the acceptance marker.
pub struct AttestationValidator {
    transport: Arc<dyn Transport>,
    endpoint: ServiceEndpoint,
    config: AttestationConfig,
    read_limit: usize,
}

impl AttestationValidator {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: ServiceEndpoint,
        config: AttestationConfig,
        read_limit: usize,
    ) -> Self {
        Self {
            transport,
            endpoint,
            config,
            read_limit,
        }
    }

    /// Runs one attestation exchange over its own session.
    ///
    /// Never fails: transport errors become a rejected verdict.
    pub async fn validate(&self) -> AttestationVerdict {
        let request = match HttpRequest::post_json(&self.endpoint, &self.config.descriptor) {
            Ok(request) => request,
            Err(e) => return AttestationVerdict::Rejected(RejectionReason::Transport(e.to_string())),
        };

        let raw = match self
            .transport
            .exchange(&self.endpoint, &request, ReadMode::Bounded(self.read_limit))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(endpoint = %self.endpoint, "Attestation request failed: {}", e);
                return AttestationVerdict::Rejected(RejectionReason::Transport(e.to_string()));
            }
        };

        if raw.is_empty() {
            warn!(endpoint = %self.endpoint, "Attestation reply was empty");
            return AttestationVerdict::Rejected(RejectionReason::EmptyResponse);
        }

        info!("Response from sales service: {}", String::from_utf8_lossy(&raw));

        let body = String::from_utf8_lossy(response_body(&raw));
        if body.contains(&self.config.acceptance_marker) {
            debug!("System information accepted");
            AttestationVerdict::Accepted
        } else {
            AttestationVerdict::Rejected(RejectionReason::MarkerMissing)
        }
    }
}
