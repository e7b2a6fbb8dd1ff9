//! Attestation configuration.

use serde::{Deserialize, Serialize};

/// Descriptor of this host and program, submitted verbatim on every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_program_name")]
    pub program_name: String,

    /// Build fingerprint of the running executable.
    #[serde(default = "default_file_info")]
    pub file_info: String,

    #[serde(default = "default_cpu_model")]
    pub cpu_model: String,

    #[serde(default = "default_num_cpus")]
    pub num_cpus: u32,
}

fn default_hostname() -> String {
    "GCA".to_string()
}

fn default_program_name() -> String {
    "integration_process".to_string()
}

fn default_file_info() -> String {
    "/home/regis/TESTE2/https-APIs/integration_process: ELF 64-bit LSB pie executable, x86-64, version 1 (SYSV), \
     dynamically linked, interpreter /lib64/ld-linux-x86-64.so.2, \
     BuildID[sha1]=798b0aadbeaac00e9662643cfc5cabe8c6589b76, for GNU/Linux 3.2.0, not stripped"
        .to_string()
}

fn default_cpu_model() -> String {
    "Intel(R) Core(TM) i5 CPU       M 450  @ 2.40GHz".to_string()
}

fn default_num_cpus() -> u32 {
    4
}

impl Default for SystemDescriptor {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            program_name: default_program_name(),
            file_info: default_file_info(),
            cpu_model: default_cpu_model(),
            num_cpus: default_num_cpus(),
        }
    }
}

impl SystemDescriptor {
    /// Indented JSON, for the startup log.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Configuration for the attestation gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationConfig {
    #[serde(default)]
    pub descriptor: SystemDescriptor,

    /// Text the sales service includes in its reply when it accepts the descriptor.
    #[serde(default = "default_acceptance_marker")]
    pub acceptance_marker: String,
}

fn default_acceptance_marker() -> String {
    "Valid system information received".to_string()
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            descriptor: SystemDescriptor::default(),
            acceptance_marker: default_acceptance_marker(),
        }
    }
}
