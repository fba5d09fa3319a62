//! Result type alias for the sync engine

use super::errors::SyncError;

/// Result type alias for sync operations
///
/// # Examples
///
/// ```
/// use incident_sync::domain::result::Result;
/// use incident_sync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::QueryFailure("relation does not exist".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
