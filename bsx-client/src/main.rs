//! BlockShareX client (bsx) - Main entry point
//!
//! Interactive session against the BlockShareX backend. One process is one
//! session: nothing is persisted between runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bsx_client::{shell, ClientConfig, ClientController};
use bsx_common::config::load_toml_config;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for bsx
#[derive(Parser, Debug)]
#[command(name = "bsx")]
#[command(about = "BlockShareX client: upload files and request recommendations")]
#[command(version)]
struct Args {
    /// Backend base URL (overrides BSX_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Path to config.toml
    #[arg(short, long, env = "BSX_CONFIG")]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());

    // Logs go to stderr; stdout belongs to the shell
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("bsx_client={level},bsx_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting BlockShareX client v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::resolve(args.api_url.as_deref(), &toml_config)
        .context("Invalid client configuration")?;
    info!("Backend: {}", config.api_url());

    let controller = ClientController::new(config).context("Failed to create HTTP client")?;

    println!("{}", shell::HELP);
    shell::run(controller, BufReader::new(tokio::io::stdin())).await?;

    info!("Session ended");
    Ok(())
}
