//! Run state machine
//!
//! `Idle -> RunningData -> RunningMeta -> Idle` on success, and
//! `Running* -> Aborted -> Idle` on any failure. The current phase is
//! published on a watch channel so observers never block the run.

use serde::Serialize;
use std::fmt;
use tokio::sync::watch;

/// Where the orchestrator is in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    RunningData,
    RunningMeta,
    Aborted,
}

impl SyncPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPhase::Idle => "idle",
            SyncPhase::RunningData => "running_data",
            SyncPhase::RunningMeta => "running_meta",
            SyncPhase::Aborted => "aborted",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SyncPhase::RunningData | SyncPhase::RunningMeta)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publishes phase transitions
#[derive(Debug)]
pub struct PhaseTracker {
    tx: watch::Sender<SyncPhase>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SyncPhase::Idle);
        Self { tx }
    }

    pub fn set(&self, phase: SyncPhase) {
        let previous = self.tx.send_replace(phase);
        tracing::debug!(from = %previous, to = %phase, "Phase transition");
    }

    pub fn current(&self) -> SyncPhase {
        *self.tx.borrow()
    }

    /// Receiver that observes every later transition
    pub fn subscribe(&self) -> watch::Receiver<SyncPhase> {
        self.tx.subscribe()
    }
}
