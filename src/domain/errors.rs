//! Domain error types
//!
//! This module defines the error taxonomy for a sync run. Every failure that can
//! occur between the watermark fetch and the final upload maps onto one of these
//! variants. Third-party error types are converted at the adapter boundary and
//! never leak through the public API.

use crate::domain::channel::Channel;
use thiserror::Error;

/// Main error type for the sync engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors, including projection catalog bugs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Watermark endpoint unreachable or answered with a non-success status
    #[error("Remote watermark service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Watermark response could not be parsed into a timestamp
    #[error("Malformed watermark for channel '{channel}': {message}")]
    MalformedWatermark { channel: Channel, message: String },

    /// Upload answered with a non-success HTTP status
    #[error("Upload to '{channel}' rejected with status {status}: {message}")]
    UploadRejected {
        channel: Channel,
        status: u16,
        message: String,
    },

    /// Network failure while talking to the remote API
    #[error("Transport error: {0}")]
    Transport(String),

    /// Extraction-layer database errors
    #[error("Query failure: {0}")]
    QueryFailure(String),

    /// A trigger arrived while another run held the run lock
    #[error("A sync run is already in progress")]
    ConcurrentRunRejected,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl SyncError {
    /// Stable snake_case label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) => "configuration",
            SyncError::RemoteUnavailable(_) => "remote_unavailable",
            SyncError::MalformedWatermark { .. } => "malformed_watermark",
            SyncError::UploadRejected { .. } => "upload_rejected",
            SyncError::Transport(_) => "transport_error",
            SyncError::QueryFailure(_) => "query_failure",
            SyncError::ConcurrentRunRejected => "concurrent_run_rejected",
            SyncError::Serialization(_) => "serialization",
            SyncError::Io(_) => "io",
        }
    }

    /// Whether the error aborts the run it occurred in
    ///
    /// A rejected concurrent trigger never started a run, so there is nothing
    /// to abort.
    pub fn is_fatal_for_run(&self) -> bool {
        !matches!(self, SyncError::ConcurrentRunRejected)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for SyncError {
    fn from(err: tokio_postgres::Error) -> Self {
        SyncError::QueryFailure(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for SyncError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        SyncError::QueryFailure(format!("Failed to get connection from pool: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_upload_rejected_display() {
        let err = SyncError::UploadRejected {
            channel: Channel::Meta,
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Upload to 'meta' rejected with status 401: bad key"
        );
    }

    #[test]
    fn test_malformed_watermark_display() {
        let err = SyncError::MalformedWatermark {
            channel: Channel::Data,
            message: "not a date".to_string(),
        };
        assert!(err.to_string().contains("'data'"));
        assert!(err.to_string().contains("not a date"));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(SyncError::ConcurrentRunRejected.kind(), "concurrent_run_rejected");
        assert_eq!(
            SyncError::Transport("reset".to_string()).kind(),
            "transport_error"
        );
        assert_eq!(SyncError::QueryFailure("x".to_string()).kind(), "query_failure");
    }

    #[test]
    fn test_concurrent_rejection_is_not_fatal() {
        assert!(!SyncError::ConcurrentRunRejected.is_fatal_for_run());
        assert!(SyncError::RemoteUnavailable("down".to_string()).is_fatal_for_run());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SyncError = json_err.into();
        assert!(matches!(err, SyncError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SyncError = toml_err.into();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_sync_error_implements_std_error() {
        let err = SyncError::ConcurrentRunRejected;
        let _: &dyn std::error::Error = &err;
    }
}
