//! Poller configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the sale poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Pause between the end of one cycle and the start of the next (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Maximum bytes read from the attestation reply.
    #[serde(default = "default_attestation_read_limit")]
    pub attestation_read_limit: usize,
}

fn default_interval() -> u64 {
    5000 // 5 seconds
}

fn default_attestation_read_limit() -> usize {
    999
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            attestation_read_limit: default_attestation_read_limit(),
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
