//! Sync orchestration
//!
//! Sequences watermark fetch, extraction, normalization and upload for the
//! `data` channel and then the `meta` channel. Every trigger source goes
//! through [`SyncOrchestrator::trigger`], which takes the single-flight
//! guard, converts any failure into an aborted summary, and always leaves the
//! machine `Idle`. The run itself is a spawned task, so dropping the caller's
//! future does not cancel it.

use crate::adapters::database::RelationalStore;
use crate::adapters::remote::RemoteApi;
use crate::config::SyncConfig;
use crate::core::catalog::tables::{BOOLEAN_FLAGS, CASE_FOREIGN_KEY, COUNTY_PAYLOAD_KEY};
use crate::core::catalog::ProjectionCatalog;
use crate::core::extract::Extractor;
use crate::core::normalize::{normalize_entity_row, normalize_incidents};
use crate::core::state::WatermarkManager;
use crate::core::sync::guard::RunGuard;
use crate::core::sync::health::HealthState;
use crate::core::sync::phase::{PhaseTracker, SyncPhase};
use crate::core::sync::summary::{RunOutcome, SyncSummary, TriggerSource};
use crate::core::upload::Uploader;
use crate::domain::{Channel, MetaPayload, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Drives sync runs
///
/// # Example
///
/// ```rust,no_run
/// use incident_sync::adapters::database::create_relational_store;
/// use incident_sync::adapters::remote::RemoteClient;
/// use incident_sync::config::load_config;
/// use incident_sync::core::catalog::ProjectionCatalog;
/// use incident_sync::core::sync::{SyncOrchestrator, TriggerSource};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("incident-sync.toml")?;
/// let store = create_relational_store(&config.database)?;
/// let remote = Arc::new(RemoteClient::new(&config.remote)?);
/// let catalog = Arc::new(ProjectionCatalog::standard()?);
///
/// let orchestrator = Arc::new(SyncOrchestrator::new(store, remote, catalog, &config));
/// let summary = orchestrator.trigger(TriggerSource::Cli).await;
/// println!("incidents uploaded: {}", summary.incidents);
/// # Ok(())
/// # }
/// ```
pub struct SyncOrchestrator {
    watermarks: WatermarkManager,
    extractor: Extractor,
    uploader: Uploader,
    store: Arc<dyn RelationalStore + Send + Sync>,
    guard: RunGuard,
    phase: PhaseTracker,
    health: HealthState,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn RelationalStore + Send + Sync>,
        remote: Arc<dyn RemoteApi + Send + Sync>,
        catalog: Arc<ProjectionCatalog>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            watermarks: WatermarkManager::new(remote.clone()),
            extractor: Extractor::new(store.clone(), catalog, config.extract.clone()),
            uploader: Uploader::new(remote, config.application.dry_run),
            store,
            guard: RunGuard::new(),
            phase: PhaseTracker::new(),
            health: HealthState::new(Utc::now()),
        }
    }

    /// Health state updated after every run
    pub fn health(&self) -> &HealthState {
        &self.health
    }

    /// Phase publisher, for observers of the state machine
    pub fn phase(&self) -> &PhaseTracker {
        &self.phase
    }

    pub fn is_running(&self) -> bool {
        self.guard.is_running()
    }

    /// Run both phases once, unless a run is already in progress
    ///
    /// Never returns an error: failures are logged and reported through the
    /// summary's [`RunOutcome`]. The run executes on its own task and holds
    /// the run lock until it finishes, even if this future is dropped.
    pub async fn trigger(self: &Arc<Self>, source: TriggerSource) -> SyncSummary {
        let permit = match self.guard.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                let summary = SyncSummary::rejected(source, self.uploader.is_dry_run());
                summary.log();
                return summary;
            }
        };

        let summary = SyncSummary::new(source, self.uploader.is_dry_run());
        let span = tracing::info_span!("sync_run", run_id = %summary.run_id, trigger = %source);
        let mut fallback = summary.clone();

        let orchestrator = Arc::clone(self);
        let task = tokio::spawn(
            async move {
                let mut summary = summary;
                orchestrator.run(&mut summary).await;
                drop(permit);
                summary
            }
            .instrument(span),
        );

        match task.await {
            Ok(summary) => summary,
            Err(e) => {
                fallback.outcome = RunOutcome::Aborted {
                    phase: self.phase.current(),
                    kind: "internal".to_string(),
                    error: e.to_string(),
                };
                self.health.record_failure(false).await;
                self.phase.set(SyncPhase::Idle);
                fallback.log();
                fallback
            }
        }
    }

    async fn run(&self, summary: &mut SyncSummary) {
        let started = Instant::now();
        tracing::info!(dry_run = summary.dry_run, "Sync run started");

        let result = match self.run_data(summary).await {
            Ok(()) => self.run_meta(summary).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            let phase = self.phase.current();
            self.phase.set(SyncPhase::Aborted);
            summary.outcome = RunOutcome::Aborted {
                phase,
                kind: e.kind().to_string(),
                error: e.to_string(),
            };
        }

        let database = match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, backend = self.store.backend_name(), "Database ping failed");
                false
            }
        };

        if summary.is_success() {
            self.health.record_success(Utc::now(), database).await;
        } else {
            self.health.record_failure(database).await;
        }

        self.phase.set(SyncPhase::Idle);
        summary.duration = started.elapsed();
        summary.log();
    }

    async fn run_data(&self, summary: &mut SyncSummary) -> Result<()> {
        self.phase.set(SyncPhase::RunningData);

        let watermark = self.watermarks.fetch(Channel::Data).await?;
        summary.data_watermark = Some(watermark.timestamp);
        crate::log_phase_start!(Channel::Data, &watermark);

        let extract = self.extractor.extract_primary_entities(&watermark).await?;
        let records = normalize_incidents(
            extract.incidents,
            extract.survivors,
            &BOOLEAN_FLAGS,
            CASE_FOREIGN_KEY,
        );
        summary.incidents = records.len();

        self.uploader.upload_data(&records).await?;
        Ok(())
    }

    async fn run_meta(&self, summary: &mut SyncSummary) -> Result<()> {
        self.phase.set(SyncPhase::RunningMeta);

        let watermark = self.watermarks.fetch(Channel::Meta).await?;
        summary.meta_watermark = Some(watermark.timestamp);
        crate::log_phase_start!(Channel::Meta, &watermark);

        let mut payload = MetaPayload::new();
        for spec in self.extractor.catalog().iter() {
            let rows = self.extractor.extract_entity(spec, &watermark).await?;
            payload.insert(
                spec.entity_name(),
                rows.into_iter().map(normalize_entity_row).collect(),
            );
        }

        let counties = self.extractor.extract_geography(&watermark).await?;
        payload.insert(COUNTY_PAYLOAD_KEY, counties);

        summary.meta_entities = payload.entity_count();
        summary.meta_rows = payload.row_count();

        self.uploader.upload_meta(&payload).await?;
        Ok(())
    }
}
