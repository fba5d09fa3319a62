//! Sync channels
//!
//! The remote API accepts two independent streams. Each has its own watermark
//! and its own upload endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two independent sync streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Primary incident records
    Data,
    /// Reference/lookup tables
    Meta,
}

impl Channel {
    /// Both channels in the order a run processes them
    pub const ALL: [Channel; 2] = [Channel::Data, Channel::Meta];

    /// Path segment used by the remote upload endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Data => "data",
            Channel::Meta => "meta",
        }
    }

    /// Field of the last-sync response that carries this channel's watermark
    pub fn watermark_field(&self) -> &'static str {
        match self {
            Channel::Data => "lastSyncIncidents",
            Channel::Meta => "lastSyncMeta",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "data" => Ok(Channel::Data),
            "meta" => Ok(Channel::Meta),
            other => Err(format!("Unknown channel '{other}'. Must be one of: data, meta")),
        }
    }
}
