//! Flood dashboard CLI

use std::path::PathBuf;

use clap::Parser;
use flood_dashboard::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "flood-dashboard")]
#[command(about = "Flood sensor and prediction dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flood API base URL (overrides config file)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, api_base_url={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.api_base_url,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(base_url) = args.api_base_url {
        config.api.base_url = base_url;
    }
    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting flood dashboard");
    flood_dashboard::run(config).await?;

    Ok(())
}
