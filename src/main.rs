//! # checklist
//!
//! Checklist server binary. Loads settings, starts logging, and serves the
//! list pages until interrupted.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use checklist_server::ServerConfig;
use checklist_telemetry::{init_telemetry, TelemetryConfig};
use clap::Parser;

/// Checklist web server.
#[derive(Parser, Debug)]
#[command(name = "checklist", about = "Session-scoped todo lists over HTTP")]
struct Cli {
    /// Settings file (defaults to `~/.checklist/settings.json`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => checklist_settings::load_settings_from_path(path),
        None => checklist_settings::load_settings(),
    }
    .with_context(|| {
        let path = cli.config.clone().unwrap_or_else(checklist_settings::settings_path);
        format!("Failed to load settings from {}", path.display())
    })?;

    let telemetry = TelemetryConfig::from_level_str(&settings.logging.level, settings.logging.json);
    init_telemetry(&telemetry).context("Failed to initialize logging")?;

    let mut config = ServerConfig::from(&settings);
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::info!(
        host = %config.host,
        port = config.port,
        rename_policy = ?config.rename_policy,
        "starting checklist server"
    );

    let handle = checklist_server::start(config)
        .await
        .context("Failed to start server")?;
    tracing::info!(port = handle.port, "checklist server ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl+c")?;

    tracing::info!("shutting down");
    handle.shutdown().await;
    Ok(())
}
