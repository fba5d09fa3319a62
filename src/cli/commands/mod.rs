//! CLI command implementations

pub mod init;
pub mod run;
pub mod status;
pub mod sync;
pub mod validate;

use crate::adapters::database::{create_relational_store, RelationalStore};
use crate::adapters::remote::{RemoteApi, RemoteClient};
use crate::config::SyncConfig;
use crate::core::catalog::ProjectionCatalog;
use crate::core::sync::SyncOrchestrator;
use crate::domain::Result;
use std::sync::Arc;

/// Wire the store, remote client and catalog into an orchestrator
pub(crate) fn build_orchestrator(config: &SyncConfig) -> Result<Arc<SyncOrchestrator>> {
    let store: Arc<dyn RelationalStore + Send + Sync> = create_relational_store(&config.database)?;
    let remote: Arc<dyn RemoteApi + Send + Sync> = Arc::new(RemoteClient::new(&config.remote)?);
    let catalog = Arc::new(ProjectionCatalog::standard()?);
    catalog.validate()?;

    Ok(Arc::new(SyncOrchestrator::new(store, remote, catalog, config)))
}

/// Process exit code for a failed run, by error kind
pub(crate) fn exit_code_for(kind: &str) -> i32 {
    match kind {
        "configuration" => 2,
        "remote_unavailable" | "transport_error" | "query_failure" => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for() {
        assert_eq!(exit_code_for("configuration"), 2);
        assert_eq!(exit_code_for("remote_unavailable"), 4);
        assert_eq!(exit_code_for("query_failure"), 4);
        assert_eq!(exit_code_for("upload_rejected"), 5);
        assert_eq!(exit_code_for("malformed_watermark"), 5);
    }
}
