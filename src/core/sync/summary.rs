//! Run summary and reporting

use crate::core::sync::phase::SyncPhase;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// What started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Delayed run shortly after process start
    Startup,
    /// Periodic schedule tick
    Schedule,
    /// Administrative HTTP endpoint
    Admin,
    /// One-shot CLI invocation
    Cli,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriggerSource::Startup => "startup",
            TriggerSource::Schedule => "schedule",
            TriggerSource::Admin => "admin",
            TriggerSource::Cli => "cli",
        };
        f.write_str(name)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Both channels uploaded
    Completed,
    /// A phase failed; later phases did not run
    Aborted {
        phase: SyncPhase,
        kind: String,
        error: String,
    },
    /// Another run held the lock; nothing was done
    Rejected,
}

/// Summary of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub run_id: Uuid,
    pub trigger: TriggerSource,
    pub outcome: RunOutcome,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    /// Normalized incidents uploaded on the `data` channel
    pub incidents: usize,
    /// Entities in the `meta` payload, including the geographic hierarchy
    pub meta_entities: usize,
    /// Top-level rows in the `meta` payload
    pub meta_rows: usize,
    pub data_watermark: Option<DateTime<Utc>>,
    pub meta_watermark: Option<DateTime<Utc>>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl SyncSummary {
    pub fn new(trigger: TriggerSource, dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            trigger,
            outcome: RunOutcome::Completed,
            dry_run,
            started_at: Utc::now(),
            incidents: 0,
            meta_entities: 0,
            meta_rows: 0,
            data_watermark: None,
            meta_watermark: None,
            duration: Duration::ZERO,
        }
    }

    /// Summary of a trigger that never acquired the run lock
    pub fn rejected(trigger: TriggerSource, dry_run: bool) -> Self {
        Self {
            outcome: RunOutcome::Rejected,
            ..Self::new(trigger, dry_run)
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }

    /// Emit the summary as one structured log event
    pub fn log(&self) {
        match &self.outcome {
            RunOutcome::Completed => tracing::info!(
                run_id = %self.run_id,
                trigger = %self.trigger,
                dry_run = self.dry_run,
                incidents = self.incidents,
                meta_entities = self.meta_entities,
                meta_rows = self.meta_rows,
                duration_ms = self.duration.as_millis() as u64,
                "Sync run completed"
            ),
            RunOutcome::Aborted { phase, kind, error } => tracing::error!(
                run_id = %self.run_id,
                trigger = %self.trigger,
                %phase,
                kind = kind.as_str(),
                error = error.as_str(),
                incidents = self.incidents,
                duration_ms = self.duration.as_millis() as u64,
                "Sync run aborted"
            ),
            RunOutcome::Rejected => tracing::warn!(
                run_id = %self.run_id,
                trigger = %self.trigger,
                "Sync run rejected: another run is in progress"
            ),
        }
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_summary() {
        let summary = SyncSummary::rejected(TriggerSource::Admin, false);
        assert!(!summary.is_success());
        assert_eq!(summary.outcome, RunOutcome::Rejected);
    }

    #[test]
    fn test_summary_serializes_outcome_tag() {
        let mut summary = SyncSummary::new(TriggerSource::Schedule, false);
        summary.outcome = RunOutcome::Aborted {
            phase: SyncPhase::RunningMeta,
            kind: "upload_rejected".to_string(),
            error: "status 500".to_string(),
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["outcome"]["status"], "aborted");
        assert_eq!(value["outcome"]["phase"], "running_meta");
        assert_eq!(value["trigger"], "schedule");
        assert_eq!(value["duration"], 0);
    }
}
