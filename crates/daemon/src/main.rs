use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salebridge_core::{
    load_config, spawn_bootstrap, validate_config, CredentialBundle, SalePoller, ServerTrust,
    TlsContext, TlsTransport, Transport,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    let json_logs = std::env::var("SALEBRIDGE_LOG_FORMAT").is_ok_and(|format| format == "json");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    info!("Starting salebridge v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("SALEBRIDGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "System information:\n{}",
        config.attestation.descriptor.to_pretty_json()
    );

    // Credentials may be produced by an external generator; wait for it
    // before touching the key files.
    spawn_bootstrap(config.bootstrap.clone())
        .wait()
        .await
        .context("Credential bootstrap failed")?;

    let credentials = CredentialBundle::load(&config.tls.cert_path, &config.tls.key_path)
        .context("Failed to load client credentials")?;
    info!(
        "Client certificate loaded from {:?} (sha256 {})",
        config.tls.cert_path,
        credentials.fingerprint()
    );

    let trust = config
        .tls
        .server_trust()
        .context("Failed to load server trust roots")?;
    match &trust {
        ServerTrust::AcceptAny => {
            warn!("No tls.ca_path configured, server certificates will not be verified")
        }
        ServerTrust::Roots(roots) => info!("Verifying servers against {} root(s)", roots.len()),
    }

    let context = TlsContext::new(&credentials, trust).context("Failed to build TLS context")?;
    let transport = TlsTransport::new(&context);
    let stats = transport.stats();
    let transport: Arc<dyn Transport> = Arc::new(transport);

    info!(
        "Polling {} every {}ms",
        config.services.sales.latest_sale_endpoint(),
        config.poller.interval_ms
    );

    SalePoller::from_config(transport, &config)
        .run(shutdown_signal())
        .await;

    info!(
        opened = stats.opened(),
        closed = stats.closed(),
        "Shut down cleanly"
    );

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
