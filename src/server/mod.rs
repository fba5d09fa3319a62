//! Admin HTTP surface
//!
//! - `GET /` returns the health snapshot
//! - `POST /sync` runs a sync and answers `true` on success, `false` when the
//!   run aborted or another run was in progress

use crate::config::ServerConfig;
use crate::core::sync::{HealthSnapshot, SyncOrchestrator, TriggerSource};
use crate::domain::{Result, SyncError};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

async fn health(State(orchestrator): State<Arc<SyncOrchestrator>>) -> Json<HealthSnapshot> {
    Json(orchestrator.health().snapshot().await)
}

async fn sync(State(orchestrator): State<Arc<SyncOrchestrator>>) -> Json<bool> {
    let summary = orchestrator.trigger(TriggerSource::Admin).await;
    Json(summary.is_success())
}

/// Router for the admin surface
pub fn build_router(orchestrator: Arc<SyncOrchestrator>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/sync", post(sync))
        .with_state(orchestrator)
}

/// Serve the admin surface until shutdown is signalled
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] for an unparsable bind address and
/// [`SyncError::Io`] if the socket cannot be bound or the server fails.
pub async fn serve(
    config: &ServerConfig,
    orchestrator: Arc<SyncOrchestrator>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        SyncError::Configuration(format!(
            "Invalid server.bind_address '{}': {e}",
            config.bind_address
        ))
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Admin server listening");

    axum::serve(listener, build_router(orchestrator))
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("Admin server stopping");
        })
        .await?;

    Ok(())
}
