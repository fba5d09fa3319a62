//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! - Environment variable substitution (`${VAR_NAME}`) inside the file
//! - `INCIDENT_SYNC_<SECTION>_<KEY>` overrides applied after parsing
//! - Default values for every optional setting
//! - Secrets held in zeroizing containers ([`SecretString`])
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [remote]
//! base_url = "https://stats.example.org/api"
//! client_name = "hak"
//! api_key = "${NEUVO_SECRET}"
//!
//! [database]
//! connection_string = "${INCIDENT_SYNC_DSN}"
//!
//! [schedule]
//! interval_seconds = 3600
//! startup_delay_seconds = 10
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use incident_sync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("incident-sync.toml")?;
//! println!("Remote API: {}", config.remote.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DatabaseConfig, Environment, ExtractConfig, LoggingConfig, RemoteConfig,
    ScheduleConfig, ServerConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
