use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cm_host::bootstrap::{load_config_or_default, paths, run_app, tracing::init_tracing_subscriber};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "clickmemory")]
#[command(about = "ClickMemory companion: snippet cache and quick-insert menu", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Key-value store file, or `:memory:`
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Override the default web app endpoint
    #[arg(short, long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout is the bridge; the subscriber writes to stderr only
    if let Err(e) = init_tracing_subscriber() {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => paths::default_config_path()?,
    };
    let mut config = load_config_or_default(&config_path).inspect_err(|e| {
        error!(path = %config_path.display(), error = %e, "Failed to load config");
    })?;

    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(endpoint) = cli.endpoint {
        config.default_endpoint = endpoint;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting ClickMemory companion");
    run_app(config).await
}
