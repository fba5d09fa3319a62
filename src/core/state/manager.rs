//! Watermark acquisition
//!
//! Watermarks are owned by the remote system. The manager fetches them on
//! demand and never caches them, so every phase starts from the remote's
//! current view.

use crate::adapters::remote::RemoteApi;
use crate::core::state::watermark::Watermark;
use crate::domain::{Channel, Result};
use std::sync::Arc;

/// Fetches watermarks from the remote aggregation API
#[derive(Clone)]
pub struct WatermarkManager {
    remote: Arc<dyn RemoteApi + Send + Sync>,
}

impl WatermarkManager {
    pub fn new(remote: Arc<dyn RemoteApi + Send + Sync>) -> Self {
        Self { remote }
    }

    /// Fetch the watermark for one channel
    ///
    /// # Errors
    ///
    /// Propagates `RemoteUnavailable` and `MalformedWatermark` unchanged; the
    /// caller aborts the run.
    pub async fn fetch(&self, channel: Channel) -> Result<Watermark> {
        match self.remote.fetch_watermark(channel).await {
            Ok(watermark) => Ok(watermark),
            Err(e) => {
                tracing::error!(%channel, error = %e, kind = e.kind(), "Watermark fetch failed");
                Err(e)
            }
        }
    }

    /// Fetch the watermarks of every channel, in run order
    ///
    /// # Errors
    ///
    /// Fails on the first channel that cannot be fetched.
    pub async fn fetch_all(&self) -> Result<Vec<Watermark>> {
        let mut watermarks = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            watermarks.push(self.fetch(channel).await?);
        }
        Ok(watermarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::remote::UploadAck;
    use crate::domain::SyncError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    struct FixedRemote;

    #[async_trait]
    impl RemoteApi for FixedRemote {
        async fn fetch_watermark(&self, channel: Channel) -> Result<Watermark> {
            match channel {
                Channel::Data => Ok(Watermark::new(
                    channel,
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                )),
                Channel::Meta => Err(SyncError::RemoteUnavailable("down".to_string())),
            }
        }

        async fn upload(&self, channel: Channel, _payload: &Value) -> Result<UploadAck> {
            Ok(UploadAck::skipped(channel))
        }
    }

    #[tokio::test]
    async fn test_fetch_single_channel() {
        let manager = WatermarkManager::new(Arc::new(FixedRemote));
        let watermark = manager.fetch(Channel::Data).await.unwrap();
        assert_eq!(watermark.channel, Channel::Data);
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_failure() {
        let manager = WatermarkManager::new(Arc::new(FixedRemote));
        let err = manager.fetch_all().await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteUnavailable(_)));
    }
}
