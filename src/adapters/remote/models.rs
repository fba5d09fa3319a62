//! Wire types of the remote aggregation API

use crate::domain::Channel;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `GET /external/{client}/sync/last`
///
/// Kept as a raw map so that a missing field can be reported per channel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LastSyncResponse(pub Map<String, Value>);

impl LastSyncResponse {
    /// Raw watermark value for a channel
    pub fn field(&self, channel: Channel) -> Option<&Value> {
        self.0.get(channel.watermark_field())
    }
}

/// Body of `POST /external/{client}/sync/{channel}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody<'a, T: Serialize> {
    pub api_key: &'a str,
    pub name: &'a str,
    pub data: &'a T,
}

/// What the remote answered to an accepted upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadAck {
    /// Channel the payload was posted to
    pub channel: Channel,

    /// HTTP status of the response
    pub status: u16,

    /// Response body, `Null` when empty or not JSON
    pub body: Value,
}

impl UploadAck {
    /// Acknowledgment for an upload skipped in dry-run mode
    pub fn skipped(channel: Channel) -> Self {
        Self {
            channel,
            status: 0,
            body: Value::Null,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status == 0
    }
}
