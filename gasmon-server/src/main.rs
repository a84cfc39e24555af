//! gasmon - Main Entry Point

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use gasmon_charts::ChartDimensions;
use gasmon_common::{init_logging, LoggingConfig, ThingSpeakClient};
use gasmon_config::ConfigLoader;
use gasmon_server::{start_server, AppState};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match args.config {
        Some(path) => ConfigLoader::load_from_file(&path)?,
        None => ConfigLoader::load()?,
    };

    // Initialize logging
    let logging_config = LoggingConfig {
        level: args
            .log_level
            .unwrap_or_else(|| config.logging.level.clone()),
        pretty_format: config.logging.pretty,
        file_path: config.logging.file.clone(),
        ..LoggingConfig::default()
    };
    init_logging(logging_config).map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting gasmon");
    info!("Upstream feed: {}", config.thingspeak.feed_url);

    // Build the feed client and shared state
    let client = ThingSpeakClient::new(config.thingspeak.to_client_config())?;
    let state = AppState {
        feed_source: Arc::new(client),
        chart_dimensions: ChartDimensions {
            width: config.chart.width,
            height: config.chart.height,
        },
    };

    start_server(state, &config.server.bind_address()).await?;

    info!("gasmon has shut down");
    Ok(())
}
