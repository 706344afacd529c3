//! chrony-bridge — REST control plane for a chronyd instance.
//!
//! `chrony-bridge serve` binds an HTTP listener and exposes the /chrony/*
//! endpoints over a `ChronyManager` built from chrony-bridge.toml.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrony_bridge::{serve, BridgeConfig, ChronyManager};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// chrony-bridge — REST control plane for chronyd.
#[derive(Parser)]
#[command(
    name = "chrony-bridge",
    version,
    about = "chrony-bridge — REST control plane for chronyd"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server exposing the /chrony/* endpoints
    Serve {
        /// Path to chrony-bridge.toml [default: ./chrony-bridge.toml or ~/.config/chrony-bridge/chrony-bridge.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// HTTP port to listen on
        #[arg(short, long, default_value = "17003")]
        port: u16,
        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with env filter (RUST_LOG controls verbosity)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    // Ctrl-C handler — cancels the root token for graceful shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutting down chrony-bridge...");
        cancel_for_signal.cancel();
    });

    match cli.command {
        Commands::Serve { config, port, host } => {
            let config = load_config(config).await?;
            run_serve(config, host, port, cancel).await?;
        }
    }

    Ok(())
}

/// Build the manager from config and serve until cancelled.
async fn run_serve(
    config: BridgeConfig,
    host: String,
    port: u16,
    cancel: CancellationToken,
) -> Result<()> {
    let manager = Arc::new(ChronyManager::new(&config));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", host, port, e))?;

    serve(manager, addr, cancel)
        .await
        .map_err(|e| anyhow::anyhow!("chrony-bridge HTTP server error: {}", e))?;

    Ok(())
}

/// Load bridge config: explicit flag → ./chrony-bridge.toml →
/// ~/.config/chrony-bridge/chrony-bridge.toml → built-in defaults.
async fn load_config(explicit: Option<PathBuf>) -> Result<BridgeConfig> {
    let path = match explicit {
        Some(path) => Some(path),
        None => resolve_config_path(),
    };

    match path {
        Some(path) => {
            let config = BridgeConfig::load(&path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            tracing::info!(path = %path.display(), "loaded bridge config");
            Ok(config)
        }
        None => {
            tracing::info!("no chrony-bridge.toml found, using built-in defaults");
            Ok(BridgeConfig::default())
        }
    }
}

/// Look for a config file in the conventional locations.
fn resolve_config_path() -> Option<PathBuf> {
    let local = Path::new("chrony-bridge.toml");
    if local.exists() {
        return Some(local.to_path_buf());
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg = config_dir.join("chrony-bridge").join("chrony-bridge.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }

    None
}
