//! Channel list backends.
//!
//! Two [`ChannelStore`] implementations back the dashboard:
//!
//! - **[`HttpChannelStore`]** fetches `{"result": [...]}` from the ranking
//!   aggregation API with retry and backoff.
//! - **[`FileChannelStore`]** reads the same document from a local JSON file,
//!   useful for offline browsing and tests.
//!
//! # Retry Strategy
//!
//! The HTTP store uses exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (other) → fail immediately
//! - Network errors → retry
//!
//! Backoff schedule: 1s, 2s, 4s, 8s, ... capped at 32s.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};
use vtdash_core::store::ChannelStore;
use vtdash_core::{Channel, ChannelsResponse};

use crate::config::SourceConfig;

/// Create the store selected by `[source].kind`.
pub fn create_store(config: &SourceConfig) -> Result<Box<dyn ChannelStore>> {
    match config.kind.as_str() {
        "http" => {
            let url = config
                .url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("source.url required"))?;
            Ok(Box::new(HttpChannelStore::new(
                url,
                Duration::from_secs(config.timeout_secs),
                config.max_retries,
            )?))
        }
        "file" => {
            let path = config
                .path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("source.path required"))?;
            Ok(Box::new(FileChannelStore::new(path)))
        }
        other => bail!("Unknown source kind: '{}'", other),
    }
}

/// Accepts both the API envelope and a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelsDocument {
    Envelope(ChannelsResponse),
    List(Vec<Channel>),
}

/// Parse a channel list document.
pub fn parse_channels(json: &str) -> Result<Vec<Channel>> {
    let doc: ChannelsDocument =
        serde_json::from_str(json).with_context(|| "Invalid channel list JSON")?;
    Ok(match doc {
        ChannelsDocument::Envelope(resp) => resp.result,
        ChannelsDocument::List(list) => list,
    })
}

/// Channel list served by the aggregation API.
pub struct HttpChannelStore {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
}

impl HttpChannelStore {
    pub fn new(url: impl Into<String>, timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vtdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            max_retries,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChannelStore for HttpChannelStore {
    async fn fetch_channels(&self) -> Result<Vec<Channel>> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                debug!(attempt, ?delay, "retrying channel fetch");
                tokio::time::sleep(delay).await;
            }

            match self.client.get(&self.url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let body = response.text().await?;
                        let channels = parse_channels(&body)?;
                        debug!(count = channels.len(), url = %self.url, "fetched channels");
                        return Ok(channels);
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    if status.as_u16() == 429 || status.is_server_error() {
                        warn!(%status, attempt, "channel API returned retryable error");
                        last_err = Some(anyhow::anyhow!(
                            "Channel API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    bail!("Channel API error {}: {}", status, body_text);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "channel API request failed");
                    last_err = Some(e.into());
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Channel fetch failed after retries")))
    }
}

/// Channel list read from a local JSON file on every fetch.
pub struct FileChannelStore {
    path: PathBuf,
}

impl FileChannelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ChannelStore for FileChannelStore {
    async fn fetch_channels(&self) -> Result<Vec<Channel>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read channel file: {}", self.path.display()))?;
        parse_channels(&content)
            .with_context(|| format!("Failed to parse channel file: {}", self.path.display()))
    }
}
