//! Bootstrap configuration.

use serde::{Deserialize, Serialize};

/// External credential generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Program to run. `None` means credentials are provisioned ahead of time.
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments passed before the process id, which is always appended last.
    #[serde(default)]
    pub args: Vec<String>,
}

impl BootstrapConfig {
    pub fn is_enabled(&self) -> bool {
        self.command.is_some()
    }
}
