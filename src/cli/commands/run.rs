//! Run command implementation
//!
//! Long-running agent mode: the scheduler fires the startup and periodic
//! triggers while the admin server accepts manual ones. Both share one
//! orchestrator, so its run lock keeps the triggers single-flight.

use crate::cli::commands::build_orchestrator;
use crate::config::load_config;
use crate::core::sync::Scheduler;
use crate::log_error_with_context;
use crate::server;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Extract and normalize without uploading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the startup and periodic triggers; only the admin server runs
    #[arg(long)]
    pub no_schedule: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync agent");

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
        if self.no_schedule {
            tracing::info!("Disabling scheduled sync from CLI");
            config.schedule.enabled = false;
        }

        let orchestrator = match build_orchestrator(&config) {
            Ok(o) => o,
            Err(e) => {
                log_error_with_context!(&e, "Failed to initialize sync agent");
                eprintln!("Failed to initialize sync agent: {e}");
                return Ok(4);
            }
        };

        let scheduler = tokio::spawn(
            Scheduler::new(orchestrator.clone(), config.schedule.clone())
                .run(shutdown_signal.clone()),
        );

        if config.server.enabled {
            let server_config = config.server.clone();
            let server_task = tokio::spawn({
                let orchestrator = orchestrator.clone();
                let shutdown = shutdown_signal.clone();
                async move { server::serve(&server_config, orchestrator, shutdown).await }
            });

            match server_task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    log_error_with_context!(&e, "Admin server failed");
                    eprintln!("Admin server failed: {e}");
                    return Ok(5);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Admin server task failed");
                    return Ok(5);
                }
            }
        } else {
            while !*shutdown_signal.borrow() {
                if shutdown_signal.changed().await.is_err() {
                    break;
                }
            }
        }

        // An in-flight run finishes before the scheduler returns
        if let Err(e) = scheduler.await {
            tracing::error!(error = %e, "Scheduler task failed");
            return Ok(5);
        }

        tracing::info!("Sync agent stopped");
        Ok(0)
    }
}
