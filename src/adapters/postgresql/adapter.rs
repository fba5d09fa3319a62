//! PostgreSQL adapter implementing the relational store trait

use crate::adapters::database::traits::RelationalStore;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::row_to_json;
use crate::core::extract::SelectQuery;
use crate::domain::{RawRow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// PostgreSQL implementation of [`RelationalStore`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl RelationalStore for PostgreSQLAdapter {
    async fn query(&self, query: &SelectQuery, since: DateTime<Utc>) -> Result<Vec<RawRow>> {
        tracing::debug!(entity = query.entity(), sql = query.sql(), %since, "Running query");

        let rows = self.client.query(query.sql(), &[&since]).await?;
        let rows = rows.iter().map(row_to_json).collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            entity = query.entity(),
            rows = rows.len(),
            "Query returned rows"
        );
        Ok(rows)
    }

    async fn ping(&self) -> Result<()> {
        self.client.test_connection().await
    }

    fn backend_name(&self) -> &str {
        "postgresql"
    }
}
