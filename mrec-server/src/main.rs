//! mrec-server - Music recognition microservice
//!
//! Accepts a recorded clip on `POST /recognize`, forwards it to the external
//! recognition service and answers with normalized track metadata. A copy of
//! every clip is kept under the recordings directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mrec_common::config::{default_config_path, load_toml_config};
use mrec_server::config::{CliOverrides, ServiceConfig, MODULE_NAME};
use mrec_server::services::{AudioStore, ConnectionRegistry, RecognitionClient};
use mrec_server::{serve, AppState};

/// Command-line arguments for mrec-server
#[derive(Parser, Debug)]
#[command(name = "mrec-server")]
#[command(about = "Music recognition microservice")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config_dir>/mrec/mrec-server.toml)
    #[arg(short, long, env = "MREC_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long, env = "MREC_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MREC_PORT")]
    port: Option<u16>,

    /// Directory for stored recordings
    #[arg(short, long, env = "MREC_RECORDINGS_DIR")]
    recordings_dir: Option<PathBuf>,

    /// Upper bound on one recognition call, in seconds
    #[arg(long, env = "MREC_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "MREC_MAX_UPLOAD_BYTES")]
    max_upload_bytes: Option<usize>,

    /// Answer "not recognized" with 404 instead of 200
    #[arg(long, env = "MREC_STRICT_STATUS_CODES")]
    strict_status_codes: Option<bool>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind_address: self.bind_address.clone(),
            port: self.port,
            recordings_dir: self.recordings_dir.clone(),
            request_timeout_secs: self.request_timeout_secs,
            max_upload_bytes: self.max_upload_bytes,
            strict_status_codes: self.strict_status_codes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path(MODULE_NAME));
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => Default::default(),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "mrec_server={level},mrec_common={level},tower_http={level}",
                    level = toml_config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mrec-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let config = ServiceConfig::resolve(&args.overrides(), &toml_config)
        .context("Failed to resolve configuration")?;

    info!("Recognition endpoint: {}", config.endpoint.url);
    info!("Recognition timeout: {:?}", config.request_timeout);

    let audio_store = AudioStore::new(&config.recordings_dir);
    match audio_store.ensure_directory().await {
        Ok(()) => info!("Recordings directory: {}", config.recordings_dir.display()),
        Err(e) => warn!("{} (recordings will be retried per request)", e),
    }

    let recognizer = RecognitionClient::new(config.endpoint.clone(), config.request_timeout)
        .context("Failed to initialize recognition client")?;

    let state = AppState::new(Arc::new(recognizer), audio_store)
        .with_strict_status_codes(config.strict_status_codes)
        .with_max_upload_bytes(config.max_upload_bytes);
    let connections = ConnectionRegistry::new();

    let listener = tokio::net::TcpListener::bind(config.listen_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_address()))?;
    info!("Listening on http://{}", config.listen_address());
    info!("Health check: http://{}/health", config.listen_address());

    let closed = serve(listener, state, connections, shutdown_signal())
        .await
        .context("Server error")?;
    info!(connections_closed = closed, "Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
