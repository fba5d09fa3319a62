//! Sync orchestration, single-flight guard and scheduling

pub mod guard;
pub mod health;
pub mod orchestrator;
pub mod phase;
pub mod scheduler;
pub mod summary;

pub use guard::{RunGuard, RunPermit};
pub use health::{HealthSnapshot, HealthState};
pub use orchestrator::SyncOrchestrator;
pub use phase::{PhaseTracker, SyncPhase};
pub use scheduler::{next_tick_delay, Scheduler};
pub use summary::{RunOutcome, SyncSummary, TriggerSource};
