//! Health state written after each run

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the health endpoint reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    /// Last run did not abort
    pub healthy: bool,
    /// Last database probe succeeded
    pub database: bool,
    /// Completion time of the last successful run
    pub last_sync: Option<DateTime<Utc>>,
    /// Process start
    pub started: DateTime<Utc>,
}

/// Shared, cheaply cloneable health state
#[derive(Debug, Clone)]
pub struct HealthState {
    inner: Arc<RwLock<HealthSnapshot>>,
}

impl HealthState {
    pub fn new(started: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HealthSnapshot {
                healthy: true,
                database: false,
                last_sync: None,
                started,
            })),
        }
    }

    pub async fn snapshot(&self) -> HealthSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn record_success(&self, finished_at: DateTime<Utc>, database: bool) {
        let mut state = self.inner.write().await;
        state.healthy = true;
        state.database = database;
        state.last_sync = Some(finished_at);
    }

    /// Mark the last run as aborted; `last_sync` keeps the previous success
    pub async fn record_failure(&self, database: bool) {
        let mut state = self.inner.write().await;
        state.healthy = false;
        state.database = database;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_failure_keeps_last_sync() {
        let started = Utc::now();
        let health = HealthState::new(started);
        health.record_success(started, true).await;
        health.record_failure(false).await;

        let snapshot = health.snapshot().await;
        assert!(!snapshot.healthy);
        assert!(!snapshot.database);
        assert_eq!(snapshot.last_sync, Some(started));
    }

    #[tokio::test]
    async fn test_snapshot_serializes_camel_case() {
        let started = "2024-03-01T00:00:00Z".parse().unwrap();
        let health = HealthState::new(started);

        let value = serde_json::to_value(health.snapshot().await).unwrap();
        assert_eq!(
            value,
            json!({
                "healthy": true,
                "database": false,
                "lastSync": null,
                "started": "2024-03-01T00:00:00Z"
            })
        );
    }
}
