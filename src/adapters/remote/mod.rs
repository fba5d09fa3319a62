//! Remote aggregation API integration
//!
//! The remote system owns the watermarks and receives both upload channels.

pub mod client;
pub mod models;
pub mod traits;

pub use client::RemoteClient;
pub use models::{LastSyncResponse, UploadAck, UploadBody};
pub use traits::RemoteApi;
