mod config;
mod error;
mod goip;
mod udp;

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "goip-gateway")]
#[command(about = "UDP gateway for GoIP GSM devices")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config from {:?}: {}", cli.config, e);
        eprintln!("Using default configuration");
        config::Config::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("goip-gateway v{}", env!("CARGO_PKG_VERSION"));

    // Bind up front so a bad address fails startup instead of the background task
    let socket = udp::bind(&config.udp).await?;
    let max_datagram = config.udp.max_datagram;
    tokio::spawn(async move {
        if let Err(e) = udp::serve(socket, max_datagram).await {
            error!("UDP server failed: {}", e);
        }
    });

    info!("Gateway running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    Ok(())
}
