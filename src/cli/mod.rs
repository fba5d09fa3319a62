//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Incident Sync - incremental incident data sync agent
#[derive(Parser, Debug)]
#[command(name = "incident-sync")]
#[command(version, about, long_about = None)]
#[command(author = "Incident Sync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "incident-sync.toml",
        env = "INCIDENT_SYNC_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "INCIDENT_SYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the agent: scheduled syncs plus the admin HTTP surface
    Run(commands::run::RunArgs),

    /// Run a single sync now and exit
    Sync(commands::sync::SyncArgs),

    /// Show the remote watermarks for both channels
    Status(commands::status::StatusArgs),

    /// Validate configuration file and projection catalog
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
