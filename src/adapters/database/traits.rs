//! Database abstraction traits
//!
//! This module defines the trait that relational store adapters must
//! implement to feed the extractor.

use crate::core::extract::SelectQuery;
use crate::domain::{RawRow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only access to the source database
///
/// Implementations bind `since` as the query's only parameter and return
/// each row as a JSON object keyed by output column name.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Run a prepared read query
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::QueryFailure`] if the query fails
    /// or a column cannot be decoded.
    async fn query(&self, query: &SelectQuery, since: DateTime<Utc>) -> Result<Vec<RawRow>>;

    /// Check that the database answers
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be made or the probe fails.
    async fn ping(&self) -> Result<()>;

    /// Short name of the backend, used in logs
    fn backend_name(&self) -> &str;
}
