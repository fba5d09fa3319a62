//! Upload layer
//!
//! Serializes normalized payloads and posts them to the remote channel
//! endpoints. No retries: a failed upload fails the run, and the next
//! scheduled run picks the same window up again.

use crate::adapters::remote::{RemoteApi, UploadAck};
use crate::domain::{Channel, IncidentRecord, MetaPayload, Result};
use serde::Serialize;
use std::sync::Arc;

/// Posts payloads to the remote API, or only logs them in dry-run mode
#[derive(Clone)]
pub struct Uploader {
    remote: Arc<dyn RemoteApi + Send + Sync>,
    dry_run: bool,
}

impl Uploader {
    pub fn new(remote: Arc<dyn RemoteApi + Send + Sync>, dry_run: bool) -> Self {
        Self { remote, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Upload normalized incidents to the `data` channel
    ///
    /// # Errors
    ///
    /// `UploadRejected`, `Transport`, or `Serialization` if the records
    /// cannot be encoded.
    pub async fn upload_data(&self, records: &[IncidentRecord]) -> Result<UploadAck> {
        self.upload(Channel::Data, records, records.len()).await
    }

    /// Upload the accumulated reference tables to the `meta` channel
    ///
    /// # Errors
    ///
    /// Same as [`Uploader::upload_data`].
    pub async fn upload_meta(&self, payload: &MetaPayload) -> Result<UploadAck> {
        self.upload(Channel::Meta, payload, payload.row_count()).await
    }

    async fn upload<T: Serialize + ?Sized>(
        &self,
        channel: Channel,
        payload: &T,
        rows: usize,
    ) -> Result<UploadAck> {
        let value = serde_json::to_value(payload)?;

        if self.dry_run {
            let bytes = serde_json::to_vec(&value)?.len();
            tracing::info!(
                %channel,
                rows,
                bytes,
                "DRY RUN: Would upload payload"
            );
            return Ok(UploadAck::skipped(channel));
        }

        match self.remote.upload(channel, &value).await {
            Ok(ack) => {
                tracing::info!(%channel, rows, status = ack.status, "Upload accepted");
                Ok(ack)
            }
            Err(e) => {
                tracing::error!(%channel, rows, error = %e, kind = e.kind(), "Upload failed");
                Err(e)
            }
        }
    }
}
