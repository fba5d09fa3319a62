//! HTTP client for the remote aggregation API

use crate::adapters::remote::models::{LastSyncResponse, UploadAck, UploadBody};
use crate::adapters::remote::traits::RemoteApi;
use crate::config::RemoteConfig;
use crate::core::state::Watermark;
use crate::domain::{Channel, Result, SyncError};
use async_trait::async_trait;
use reqwest::{redirect, Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Header carrying the shared secret on every request
pub const SECRET_HEADER: &str = "Neuvo-Secret";

/// Longest response body quoted in an error message
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed [`RemoteApi`]
///
/// # Example
///
/// ```no_run
/// use incident_sync::adapters::remote::{RemoteApi, RemoteClient};
/// use incident_sync::config::load_config;
/// use incident_sync::domain::Channel;
///
/// # async fn example() -> incident_sync::domain::Result<()> {
/// let config = load_config("incident-sync.toml")?;
/// let remote = RemoteClient::new(&config.remote)?;
/// let watermark = remote.fetch_watermark(Channel::Data).await?;
/// println!("{watermark}");
/// # Ok(())
/// # }
/// ```
pub struct RemoteClient {
    client: Client,
    last_sync_url: Url,
    data_url: Url,
    meta_url: Url,
    config: RemoteConfig,
}

impl RemoteClient {
    /// Create a client from the remote configuration
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let base = base_url(&config.base_url)?;
        let endpoint = |suffix: &str| {
            base.join(&format!("external/{}/sync/{}", config.client_name, suffix))
                .map_err(|e| SyncError::Configuration(format!("Invalid remote endpoint: {e}")))
        };

        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the remote API");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| SyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            last_sync_url: endpoint("last")?,
            data_url: endpoint(Channel::Data.as_str())?,
            meta_url: endpoint(Channel::Meta.as_str())?,
            config: config.clone(),
        })
    }

    /// Upload endpoint for a channel
    pub fn upload_url(&self, channel: Channel) -> &Url {
        match channel {
            Channel::Data => &self.data_url,
            Channel::Meta => &self.meta_url,
        }
    }

    /// Watermark endpoint
    pub fn last_sync_url(&self) -> &Url {
        &self.last_sync_url
    }

    fn secret_header_value(&self) -> String {
        format!("Bearer {}", self.config.api_key.expose_secret().as_str())
    }
}

#[async_trait]
impl RemoteApi for RemoteClient {
    async fn fetch_watermark(&self, channel: Channel) -> Result<Watermark> {
        tracing::debug!(%channel, url = %self.last_sync_url, "Fetching watermark");

        let response = self
            .client
            .get(self.last_sync_url.clone())
            .header(SECRET_HEADER, self.secret_header_value())
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(SyncError::RemoteUnavailable(format!(
                "watermark endpoint answered {status}: {body}"
            )));
        }

        let last_sync: LastSyncResponse =
            response
                .json()
                .await
                .map_err(|e| SyncError::MalformedWatermark {
                    channel,
                    message: format!("response is not a JSON object: {e}"),
                })?;

        let raw = last_sync
            .field(channel)
            .ok_or_else(|| SyncError::MalformedWatermark {
                channel,
                message: format!("response has no '{}' field", channel.watermark_field()),
            })?;

        let watermark = Watermark::from_json(channel, raw)?;
        tracing::info!(%channel, watermark = %watermark.timestamp, "Fetched watermark");
        Ok(watermark)
    }

    async fn upload(&self, channel: Channel, payload: &Value) -> Result<UploadAck> {
        let url = self.upload_url(channel).clone();
        let api_key = self.config.api_key.expose_secret();
        let body = UploadBody {
            api_key: api_key.as_str(),
            name: &self.config.client_name,
            data: payload,
        };

        tracing::debug!(%channel, %url, "Uploading payload");

        let response = self
            .client
            .post(url)
            .header(SECRET_HEADER, self.secret_header_value())
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_body(response).await;
            return Err(SyncError::UploadRejected {
                channel,
                status: status.as_u16(),
                message,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| SyncError::Transport(describe(&e)))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(UploadAck {
            channel,
            status: status.as_u16(),
            body,
        })
    }
}

/// Parse the base URL, making sure relative joins append to its path
fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| SyncError::Configuration(format!("Invalid remote base URL '{raw}': {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_redirect() {
        format!("too many redirects: {err}")
    } else {
        err.to_string()
    }
}

async fn error_body(response: Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
