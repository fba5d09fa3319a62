//! In-memory store and remote API shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use incident_sync::adapters::database::RelationalStore;
use incident_sync::adapters::remote::{RemoteApi, UploadAck};
use incident_sync::config::{parse_config, SyncConfig};
use incident_sync::core::catalog::ProjectionCatalog;
use incident_sync::core::extract::SelectQuery;
use incident_sync::core::state::Watermark;
use incident_sync::core::sync::SyncOrchestrator;
use incident_sync::domain::{Channel, RawRow, Result, SyncError};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn config(dry_run: bool) -> SyncConfig {
    let mut config = parse_config(
        r#"
[remote]
base_url = "https://stats.example.org/api"
api_key = "test-secret"

[database]
connection_string = "postgresql://sync@localhost:5432/cases"
"#,
    )
    .unwrap();
    config.application.dry_run = dry_run;
    config
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

pub fn rows(value: Value) -> Vec<RawRow> {
    serde_json::from_value(value).unwrap()
}

/// Relational store answering every query with the rows of its table
#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<RawRow>>,
    failing: HashSet<String>,
    pub queries: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn with(mut self, table: &str, value: Value) -> Self {
        self.tables.insert(table.to_string(), rows(value));
        self
    }

    pub fn failing_on(mut self, table: &str) -> Self {
        self.failing.insert(table.to_string());
        self
    }

    pub fn queried(&self, table: &str) -> Vec<DateTime<Utc>> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == table)
            .map(|(_, since)| *since)
            .collect()
    }
}

#[async_trait]
impl RelationalStore for MemoryStore {
    async fn query(&self, query: &SelectQuery, since: DateTime<Utc>) -> Result<Vec<RawRow>> {
        self.queries
            .lock()
            .unwrap()
            .push((query.entity().to_string(), since));
        if self.failing.contains(query.entity()) {
            return Err(SyncError::QueryFailure(format!(
                "relation \"{}\" does not exist",
                query.entity()
            )));
        }
        Ok(self.tables.get(query.entity()).cloned().unwrap_or_default())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

/// Remote API that records uploads and serves fixed watermarks
pub struct FakeRemote {
    watermarks: Mutex<HashMap<Channel, DateTime<Utc>>>,
    unavailable: Mutex<HashSet<Channel>>,
    rejecting: Mutex<HashSet<Channel>>,
    dropping: Mutex<HashSet<Channel>>,
    gate: Mutex<Option<Arc<Notify>>>,
    pub fetches: Mutex<Vec<Channel>>,
    pub uploads: Mutex<Vec<(Channel, Value)>>,
}

impl FakeRemote {
    pub fn new(data: DateTime<Utc>, meta: DateTime<Utc>) -> Self {
        Self {
            watermarks: Mutex::new(HashMap::from([(Channel::Data, data), (Channel::Meta, meta)])),
            unavailable: Mutex::new(HashSet::new()),
            rejecting: Mutex::new(HashSet::new()),
            dropping: Mutex::new(HashSet::new()),
            gate: Mutex::new(None),
            fetches: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn set_unavailable(&self, channel: Channel, unavailable: bool) {
        let mut set = self.unavailable.lock().unwrap();
        if unavailable {
            set.insert(channel);
        } else {
            set.remove(&channel);
        }
    }

    pub fn set_rejecting(&self, channel: Channel, rejecting: bool) {
        let mut set = self.rejecting.lock().unwrap();
        if rejecting {
            set.insert(channel);
        } else {
            set.remove(&channel);
        }
    }

    /// Fail uploads on `channel` as if the connection were reset
    pub fn set_dropping(&self, channel: Channel, dropping: bool) {
        let mut set = self.dropping.lock().unwrap();
        if dropping {
            set.insert(channel);
        } else {
            set.remove(&channel);
        }
    }

    /// Hold every watermark fetch until the returned handle is notified
    pub fn hold_fetches(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn uploads_for(&self, channel: Channel) -> Vec<Value> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn fetches_for(&self, channel: Channel) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == channel)
            .count()
    }
}

#[async_trait]
impl RemoteApi for FakeRemote {
    async fn fetch_watermark(&self, channel: Channel) -> Result<Watermark> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.fetches.lock().unwrap().push(channel);
        if self.unavailable.lock().unwrap().contains(&channel) {
            return Err(SyncError::RemoteUnavailable("connection refused".to_string()));
        }
        let timestamp = self.watermarks.lock().unwrap()[&channel];
        Ok(Watermark::new(channel, timestamp))
    }

    async fn upload(&self, channel: Channel, payload: &Value) -> Result<UploadAck> {
        if self.dropping.lock().unwrap().contains(&channel) {
            return Err(SyncError::Transport("connection reset by peer".to_string()));
        }
        if self.rejecting.lock().unwrap().contains(&channel) {
            return Err(SyncError::UploadRejected {
                channel,
                status: 500,
                message: "internal error".to_string(),
            });
        }
        self.uploads.lock().unwrap().push((channel, payload.clone()));
        Ok(UploadAck {
            channel,
            status: 201,
            body: Value::Null,
        })
    }
}

pub fn orchestrator(
    store: Arc<MemoryStore>,
    remote: Arc<FakeRemote>,
    dry_run: bool,
) -> Arc<SyncOrchestrator> {
    Arc::new(SyncOrchestrator::new(
        store,
        remote,
        Arc::new(ProjectionCatalog::standard().unwrap()),
        &config(dry_run),
    ))
}
