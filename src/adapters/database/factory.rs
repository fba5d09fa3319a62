//! Database client factory

use crate::adapters::database::traits::RelationalStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::DatabaseConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the relational store the extractor reads from
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the pool cannot
/// be built. No connection is opened until the first query.
pub fn create_relational_store(
    config: &DatabaseConfig,
) -> Result<Arc<dyn RelationalStore + Send + Sync>> {
    let client = PostgreSQLClient::new(config.clone())?;
    tracing::info!(
        database = %client.connection_string_safe(),
        max_connections = config.max_connections,
        "Created PostgreSQL client"
    );
    let adapter = PostgreSQLAdapter::new(client);

    Ok(Arc::new(adapter) as Arc<dyn RelationalStore + Send + Sync>)
}
