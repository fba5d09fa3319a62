//! Logging and observability
//!
//! Structured logging with:
//! - JSON-formatted file logs with daily or hourly rotation
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Human-readable console output
//!
//! # Example
//!
//! ```no_run
//! use incident_sync::logging::init_logging;
//! use incident_sync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(channel = "data", rows = 12, "Extraction finished");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a sync phase
///
/// # Example
///
/// ```no_run
/// use incident_sync::log_phase_start;
/// use incident_sync::core::state::Watermark;
/// use incident_sync::domain::Channel;
///
/// let watermark = Watermark::parse(Channel::Data, "2024-03-01T09:00:00Z").unwrap();
/// log_phase_start!(Channel::Data, &watermark);
/// ```
#[macro_export]
macro_rules! log_phase_start {
    ($channel:expr, $watermark:expr) => {
        tracing::info!(
            channel = %$channel,
            since = %$watermark,
            "Starting sync phase"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use incident_sync::log_error_with_context;
/// use incident_sync::domain::SyncError;
///
/// let error = SyncError::Configuration("missing remote.base_url".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
