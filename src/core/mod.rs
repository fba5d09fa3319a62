//! Core sync engine.
//!
//! # Modules
//!
//! - [`catalog`] - Static projection catalog (allow-listed columns per entity)
//! - [`extract`] - Watermark-bounded read queries against the relational store
//! - [`normalize`] - Pure post-processing of extracted rows
//! - [`upload`] - Posting payloads to the remote channels
//! - [`state`] - Remote-authoritative watermarks
//! - [`sync`] - Orchestration, single-flight guard, health and scheduling
//!
//! # Run Workflow
//!
//! 1. **Guard**: Take the process-wide run lock or report "already running"
//! 2. **Data watermark**: Fetch `lastSyncIncidents` from the remote API
//! 3. **Extract**: Read changed incidents, their child ids and survivors
//! 4. **Normalize**: Strip null placeholders, coerce flags, attach survivors
//! 5. **Upload**: Post the incidents to the `data` channel
//! 6. **Meta watermark**: Fetch `lastSyncMeta`
//! 7. **Extract + upload meta**: Every catalog entity plus the county hierarchy
//! 8. **Report**: Update health state and log the run summary
//!
//! Any failure aborts the remaining steps and returns the machine to idle.
//!
//! # Example
//!
//! ```rust,no_run
//! use incident_sync::adapters::database::create_relational_store;
//! use incident_sync::adapters::remote::RemoteClient;
//! use incident_sync::config::load_config;
//! use incident_sync::core::catalog::ProjectionCatalog;
//! use incident_sync::core::sync::{SyncOrchestrator, TriggerSource};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("incident-sync.toml")?;
//! let orchestrator = Arc::new(SyncOrchestrator::new(
//!     create_relational_store(&config.database)?,
//!     Arc::new(RemoteClient::new(&config.remote)?),
//!     Arc::new(ProjectionCatalog::standard()?),
//!     &config,
//! ));
//!
//! let summary = orchestrator.trigger(TriggerSource::Cli).await;
//! println!("Incidents: {}", summary.incidents);
//! println!("Meta rows: {}", summary.meta_rows);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod extract;
pub mod normalize;
pub mod state;
pub mod sync;
pub mod upload;
