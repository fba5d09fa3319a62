//! Domain models and types for the sync engine.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Channels** ([`Channel`]) naming the two independent sync streams
//! - **Record shapes** ([`RawIncident`], [`IncidentRecord`], [`MetaPayload`])
//! - **Error types** ([`SyncError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, SyncError>`]:
//!
//! ```rust,no_run
//! use incident_sync::domain::{Result, SyncError};
//!
//! fn example() -> Result<()> {
//!     let _config = incident_sync::config::load_config("incident-sync.toml")?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod errors;
pub mod record;
pub mod result;

pub use channel::Channel;
pub use errors::SyncError;
pub use record::{IncidentRecord, MetaPayload, RawIncident, RawRow};
pub use result::Result;
