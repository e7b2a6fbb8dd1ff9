//! Bootstrap task and its completion signal.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::config::BootstrapConfig;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The generator could not be started.
    #[error("Failed to start credential generator '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The generator ran but reported failure.
    #[error("Credential generator '{command}' failed with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The task ended without completing the signal.
    #[error("Bootstrap task ended without signalling completion")]
    SignalDropped,
}

/// Completion signal of a bootstrap task. Completed exactly once.
#[derive(Debug)]
pub struct BootstrapSignal {
    receiver: oneshot::Receiver<Result<(), BootstrapError>>,
}

impl BootstrapSignal {
    /// Blocks until the bootstrap task reports completion.
    pub async fn wait(self) -> Result<(), BootstrapError> {
        self.receiver
            .await
            .unwrap_or(Err(BootstrapError::SignalDropped))
    }
}

/// Starts the credential generator in its own task.
///
/// With no command configured the returned signal is already complete.
pub fn spawn_bootstrap(config: BootstrapConfig) -> BootstrapSignal {
    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let result = run_generator(&config).await;
        if sender.send(result).is_err() {
            debug!("Bootstrap signal receiver dropped before completion");
        }
    });

    BootstrapSignal { receiver }
}

async fn run_generator(config: &BootstrapConfig) -> Result<(), BootstrapError> {
    let Some(command) = config.command.as_deref() else {
        debug!("No credential generator configured");
        return Ok(());
    };

    let pid = std::process::id();
    info!(command, pid, "Running credential generator");

    let output = Command::new(command)
        .args(&config.args)
        .arg(pid.to_string())
        .output()
        .await
        .map_err(|source| BootstrapError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(command, status = %output.status, "Credential generator failed");
        return Err(BootstrapError::Failed {
            command: command.to_string(),
            status: output.status,
            stderr,
        });
    }

    info!("Credential generator finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> BootstrapConfig {
        BootstrapConfig {
            command: Some("sh".to_string()),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[tokio::test]
    async fn test_no_command_completes_immediately() {
        let signal = spawn_bootstrap(BootstrapConfig::default());
        assert!(signal.wait().await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_pid_is_last_argument() {
        // With `sh -c script arg`, the first trailing argument becomes $0.
        let script = format!("test \"$0\" = \"{}\"", std::process::id());
        let signal = spawn_bootstrap(shell(&script));
        assert!(signal.wait().await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_generator() {
        let signal = spawn_bootstrap(shell("echo broken >&2; exit 3"));
        match signal.wait().await {
            Err(BootstrapError::Failed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_generator() {
        let config = BootstrapConfig {
            command: Some("/nonexistent/salebridge-keygen".to_string()),
            args: Vec::new(),
        };
        let err = spawn_bootstrap(config).wait().await.unwrap_err();
        assert!(matches!(err, BootstrapError::Spawn { .. }));
    }
}
