// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wiimote_driver")]
#[command(author, version, about = "Wii Remote report mapper")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/wiimote/driver.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print every output and input report as hex on stderr
    #[arg(long, global = true)]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List attached Wii Remotes
    #[command(visible_alias = "ls")]
    List,

    /// Stream decoded events from the first remote to stdout (default)
    #[command(visible_alias = "l")]
    Listen {
        /// Request battery status as soon as the remote connects
        #[arg(short, long)]
        status: bool,

        /// Request battery status periodically
        #[arg(long, value_name = "SECS")]
        status_every: Option<u64>,

        /// Also print every raw input report as hex on stdout
        #[arg(long)]
        raw: bool,
    },

    /// Connect, request battery status, and print the driver state
    #[command(visible_aliases = ["st", "battery", "bat"])]
    State {
        /// How long to wait for the status report
        #[arg(long, default_value_t = 500, value_name = "MS")]
        wait_ms: u64,
    },

    /// Feed a report script through the driver without a device
    Replay {
        /// Script file (hex reports, connect, disconnect, status)
        file: PathBuf,

        /// Drain the buffer only once at the end instead of after each step
        #[arg(long)]
        batch: bool,
    },
}
