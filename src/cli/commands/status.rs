//! Status command implementation
//!
//! Prints the remote watermark for each channel, i.e. where the next run will
//! resume from.

use crate::adapters::remote::RemoteClient;
use crate::config::load_config;
use crate::core::state::WatermarkManager;
use crate::log_error_with_context;
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sync status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let remote = match RemoteClient::new(&config.remote) {
            Ok(r) => r,
            Err(e) => {
                println!("Failed to create remote client");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        let last_sync_url = remote.last_sync_url().to_string();
        let manager = WatermarkManager::new(Arc::new(remote));

        let watermarks = match manager.fetch_all().await {
            Ok(w) => w,
            Err(e) => {
                log_error_with_context!(&e, "Failed to fetch watermarks");
                println!("Failed to fetch watermarks from {last_sync_url}");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        println!("Sync Status ({last_sync_url})");
        println!();
        println!("{:<10} {:<32}", "Channel", "Last Sync");
        println!("{}", "-".repeat(42));
        for watermark in &watermarks {
            println!(
                "{:<10} {:<32}",
                watermark.channel.as_str(),
                watermark.timestamp.format("%Y-%m-%d %H:%M:%S%.3f UTC")
            );
        }
        println!();

        Ok(0)
    }
}
