//! One-shot sync command

use crate::cli::commands::{build_orchestrator, exit_code_for};
use crate::config::load_config;
use crate::core::sync::{RunOutcome, TriggerSource};
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Extract and normalize without uploading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let orchestrator = match build_orchestrator(&config) {
            Ok(o) => o,
            Err(e) => {
                log_error_with_context!(&e, "Failed to initialize sync");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(4);
            }
        };

        let summary = orchestrator.trigger(TriggerSource::Cli).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!();
            println!("Sync Summary:");
            println!("  Run ID: {}", summary.run_id);
            if summary.dry_run {
                println!("  Mode: dry run (nothing uploaded)");
            }
            if let Some(since) = summary.data_watermark {
                println!("  Data watermark: {}", since.to_rfc3339());
            }
            println!("  Incidents: {}", summary.incidents);
            if let Some(since) = summary.meta_watermark {
                println!("  Meta watermark: {}", since.to_rfc3339());
            }
            println!(
                "  Meta entities: {} ({} rows)",
                summary.meta_entities, summary.meta_rows
            );
            println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
            println!();
        }

        let exit_code = match &summary.outcome {
            RunOutcome::Completed => {
                if !self.json {
                    println!("Sync completed successfully");
                }
                0
            }
            RunOutcome::Aborted { phase, kind, error } => {
                eprintln!("Sync aborted during {phase}: {error}");
                exit_code_for(kind)
            }
            RunOutcome::Rejected => {
                eprintln!("Sync rejected: another run is in progress");
                5
            }
        };

        Ok(exit_code)
    }
}
