//! External system integrations.
//!
//! - [`database`] - Relational store abstraction (trait-based)
//! - [`postgresql`] - PostgreSQL implementation of the store
//! - [`remote`] - HTTP client for the remote aggregation API
//!
//! # Design Pattern
//!
//! The core never talks to `tokio-postgres` or `reqwest` directly. It sees
//! [`database::RelationalStore`] and [`remote::RemoteApi`], so tests drive
//! the orchestrator with in-memory fakes.
//!
//! ```rust,no_run
//! use incident_sync::adapters::database::create_relational_store;
//! use incident_sync::adapters::remote::{RemoteApi, RemoteClient};
//! use incident_sync::config::load_config;
//! use incident_sync::domain::Channel;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("incident-sync.toml")?;
//!
//! let store = create_relational_store(&config.database)?;
//! store.ping().await?;
//!
//! let remote = RemoteClient::new(&config.remote)?;
//! let watermark = remote.fetch_watermark(Channel::Data).await?;
//! println!("data channel last synced at {watermark}");
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
pub mod remote;
