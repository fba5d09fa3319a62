// Incident Sync - Incremental incident data sync agent
// Copyright (c) 2025 Incident Sync Contributors
// Licensed under the MIT License

//! # Incident Sync
//!
//! A scheduled agent that keeps a remote aggregation service up to date with
//! case data held in a local relational database.
//!
//! ## Overview
//!
//! Each run moves two independent channels:
//!
//! - **data**: incident reports changed since the remote's `lastSyncIncidents`,
//!   with their multi-valued child ids and survivor sub-records attached
//! - **meta**: every reference entity in the projection catalog plus the
//!   county / sub-county hierarchy, windowed on `lastSyncMeta`
//!
//! The remote system owns both watermarks. Nothing is persisted locally, so a
//! failed run simply leaves the watermark where it was and the next run
//! retries the same window.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Catalog, extraction, normalization, upload and orchestration
//! - [`adapters`] - PostgreSQL store and remote API client
//! - [`server`] - Admin HTTP surface (health and manual trigger)
//! - [`domain`] - Channels, record shapes and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use incident_sync::adapters::database::create_relational_store;
//! use incident_sync::adapters::remote::RemoteClient;
//! use incident_sync::config::load_config;
//! use incident_sync::core::catalog::ProjectionCatalog;
//! use incident_sync::core::sync::{SyncOrchestrator, TriggerSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("incident-sync.toml")?;
//!
//!     let orchestrator = Arc::new(SyncOrchestrator::new(
//!         create_relational_store(&config.database)?,
//!         Arc::new(RemoteClient::new(&config.remote)?),
//!         Arc::new(ProjectionCatalog::standard()?),
//!         &config,
//!     ));
//!
//!     let summary = orchestrator.trigger(TriggerSource::Cli).await;
//!     println!("Uploaded {} incidents", summary.incidents);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], built on [`domain::SyncError`].
//! A run never surfaces an error to its trigger: failures become an aborted
//! [`core::sync::SyncSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
