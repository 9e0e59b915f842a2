//! Wii Remote report mapper CLI
//!
//! Reads button and status reports from a paired Wii Remote and writes the
//! decoded event lines to stdout.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use wiimote_driver::DriverConfig;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the event stream
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(DriverConfig::default_path);
    debug!("Loading config from {:?}", config_path);
    let config = DriverConfig::load(&config_path)?;

    match cli.command {
        Some(Commands::List) => commands::device::list(),
        Some(Commands::State { wait_ms }) => {
            commands::device::state(config, cli.monitor, wait_ms).await
        }
        Some(Commands::Replay { file, batch }) => {
            commands::replay::replay(config, cli.monitor, &file, batch)
        }
        Some(Commands::Listen {
            status,
            status_every,
            raw,
        }) => commands::listen::listen(config, cli.monitor, status, status_every, raw).await,
        None => commands::listen::listen(config, cli.monitor, false, None, false).await,
    }
}
