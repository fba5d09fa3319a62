//! Trigger scheduling
//!
//! One delayed run after startup, then a run at every wall-clock multiple of
//! the interval (the default interval fires at the top of each hour). Stops
//! when the shutdown channel flips; a run that has started always finishes.

use crate::config::ScheduleConfig;
use crate::core::sync::orchestrator::SyncOrchestrator;
use crate::core::sync::summary::TriggerSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Time until the next wall-clock multiple of `interval`
///
/// Exactly on a boundary the full interval is returned, so a tick never fires
/// twice for the same boundary.
pub fn next_tick_delay(now: DateTime<Utc>, interval: Duration) -> Duration {
    let period = interval.as_secs().max(1);
    let into_secs = now.timestamp().rem_euclid(period as i64) as u64;
    let elapsed = Duration::from_secs(into_secs)
        + Duration::from_nanos(u64::from(now.timestamp_subsec_nanos()));
    Duration::from_secs(period)
        .checked_sub(elapsed)
        .filter(|d| !d.is_zero())
        .unwrap_or(Duration::from_secs(period))
}

/// Fires orchestrator triggers on schedule
pub struct Scheduler {
    orchestrator: Arc<SyncOrchestrator>,
    config: ScheduleConfig,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>, config: ScheduleConfig) -> Self {
        Self {
            orchestrator,
            config,
        }
    }

    /// Run until shutdown is signalled
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if !self.config.enabled {
            tracing::info!("Scheduled sync is disabled");
            return;
        }

        let interval = Duration::from_secs(self.config.interval_seconds);
        let startup_delay = Duration::from_secs(self.config.startup_delay_seconds);
        tracing::info!(
            interval_seconds = self.config.interval_seconds,
            startup_delay_seconds = self.config.startup_delay_seconds,
            "Scheduler started"
        );

        if !self.wait(startup_delay, &mut shutdown).await {
            return;
        }
        self.orchestrator.trigger(TriggerSource::Startup).await;

        loop {
            let delay = next_tick_delay(Utc::now(), interval);
            tracing::debug!(delay_ms = delay.as_millis() as u64, "Next scheduled sync");

            if !self.wait(delay, &mut shutdown).await {
                return;
            }
            self.orchestrator.trigger(TriggerSource::Schedule).await;
        }
    }

    /// Sleep for `delay`; false if shutdown was signalled first
    async fn wait(&self, delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
        if *shutdown.borrow() {
            tracing::info!("Scheduler stopping");
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = shutdown.changed() => {
                tracing::info!("Scheduler stopping");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_tick_top_of_hour() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 59, 30).unwrap();
        assert_eq!(
            next_tick_delay(now, Duration::from_secs(3600)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_next_tick_on_boundary_waits_full_interval() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(
            next_tick_delay(now, Duration::from_secs(3600)),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_next_tick_subsecond() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 4, 59).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(
            next_tick_delay(now, Duration::from_secs(300)),
            Duration::from_millis(750)
        );
    }
}
