//! Validate config command implementation

use crate::config::load_config;
use crate::core::catalog::ProjectionCatalog;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("Configuration is valid");
                c
            }
            Err(e) => {
                println!("Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let catalog = match ProjectionCatalog::standard().and_then(|c| c.validate().map(|_| c)) {
            Ok(c) => c,
            Err(e) => {
                println!("Projection catalog is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Remote API: {}", config.remote.base_url);
        println!("  Client Name: {}", config.remote.client_name);
        println!("  Max Connections: {}", config.database.max_connections);
        println!("  Incident Limit: {}", config.extract.incident_limit);
        if config.schedule.enabled {
            println!(
                "  Schedule: every {}s (first run after {}s)",
                config.schedule.interval_seconds, config.schedule.startup_delay_seconds
            );
        } else {
            println!("  Schedule: disabled");
        }
        if config.server.enabled {
            println!("  Admin Server: {}", config.server.bind_address);
        } else {
            println!("  Admin Server: disabled");
        }
        println!("  Reference Entities: {}", catalog.len());
        println!();

        Ok(0)
    }
}
