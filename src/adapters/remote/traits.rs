//! Remote API trait

use crate::adapters::remote::models::UploadAck;
use crate::core::state::Watermark;
use crate::domain::{Channel, Result};
use async_trait::async_trait;
use serde_json::Value;

/// The three calls the sync engine makes against the aggregation API
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch the last-synced watermark for a channel
    ///
    /// # Errors
    ///
    /// [`crate::domain::SyncError::RemoteUnavailable`] if the endpoint cannot
    /// be reached or answers with a non-success status, and
    /// [`crate::domain::SyncError::MalformedWatermark`] if the timestamp
    /// cannot be read.
    async fn fetch_watermark(&self, channel: Channel) -> Result<Watermark>;

    /// Post a payload to a channel
    ///
    /// # Errors
    ///
    /// [`crate::domain::SyncError::UploadRejected`] on a non-success status,
    /// [`crate::domain::SyncError::Transport`] on network failure.
    async fn upload(&self, channel: Channel, payload: &Value) -> Result<UploadAck>;
}
