//! Resolve a YouTube channel URL to its channel id.
//!
//! Handle URLs (`https://www.youtube.com/@name`) and custom URLs do not carry
//! the `UC...` id, so the channel page is fetched and the id is read from
//! the `"externalId":"UC..."` field embedded in its initial data.

use anyhow::{bail, Result};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;

const EXTERNAL_ID_KEY: &str = "\"externalId\"";

/// Find the value of the first `"externalId": "..."` pair in `html`.
pub fn extract_external_id(html: &str) -> Option<String> {
    let mut rest = html;
    while let Some(pos) = rest.find(EXTERNAL_ID_KEY) {
        rest = &rest[pos + EXTERNAL_ID_KEY.len()..];
        if let Some(id) = quoted_value_after_colon(rest) {
            return Some(id.to_string());
        }
    }
    None
}

fn quoted_value_after_colon(s: &str) -> Option<&str> {
    let s = s.strip_prefix(':')?.trim_start();
    let s = s.strip_prefix('"')?;
    let end = s.find('"')?;
    let value = &s[..end];
    (!value.is_empty()).then_some(value)
}

/// Channel id carried directly in a `/channel/UC...` URL.
pub fn id_from_channel_url(url: &str) -> Option<String> {
    let (_, tail) = url.split_once("/channel/")?;
    let id: String = tail
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    id.starts_with("UC").then_some(id)
}

/// Resolve `channel_url` to a channel id, fetching the page when needed.
pub async fn fetch_channel_id(channel_url: &str, timeout: Duration) -> Result<String> {
    let channel_url = channel_url.trim();
    if channel_url.is_empty() {
        bail!("channel URL must not be empty");
    }

    if let Some(id) = id_from_channel_url(channel_url) {
        return Ok(id);
    }

    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(channel_url).send().await?;
    let status = response.status();
    if !status.is_success() {
        bail!("Failed to fetch channel page {}: {}", channel_url, status);
    }

    let html = response.text().await?;
    match extract_external_id(&html) {
        Some(id) => {
            debug!(url = channel_url, id = %id, "resolved channel id");
            Ok(id)
        }
        None => bail!("Failed to fetch channel ID"),
    }
}

/// Run `vtdash lookup`: print the channel id of a channel URL.
pub async fn run_lookup(config: &Config, channel_url: &str) -> Result<()> {
    let id = fetch_channel_id(
        channel_url,
        Duration::from_secs(config.youtube.timeout_secs),
    )
    .await?;
    println!("{}", id);
    Ok(())
}
