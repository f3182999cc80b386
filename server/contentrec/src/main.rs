//! contentrec server binary

use anyhow::Context;
use clap::Parser;
use contentrec::{
    config::ServerConfig,
    logging::init_logging,
    server::{AppState, Runtime},
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "contentrec")]
#[command(about = "Content recommendation scoring service")]
#[command(version)]
struct Args {
    /// Configuration file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Logging level or filter directive
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ServerConfig::load().context("loading configuration")?,
    };

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    let config = config.validated().context("validating configuration")?;

    init_logging(&config.logging)?;

    info!(
        "Starting contentrec v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.host,
        config.server.port
    );

    let state = AppState::from_config(config).context("initializing recommender")?;
    let runtime = Runtime::bind(state).await?;
    runtime.serve().await?;

    Ok(())
}
