//! Channel submission to the ranking maintainers.
//!
//! Submissions are queued for manual review by a cloud function that takes
//! `{"channel_id": "...", "type": "1" | "2"}`.

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::{Config, RegisterConfig, YoutubeConfig};
use crate::lookup::fetch_channel_id;

/// Which ranking a submitted channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    /// Started out as a VTuber channel (`"1"`).
    Original,
    /// Any VTuber channel, including rebranded ones (`"2"`).
    All,
}

impl ChannelType {
    pub fn code(&self) -> &'static str {
        match self {
            ChannelType::Original => "1",
            ChannelType::All => "2",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelType::Original => "original",
            ChannelType::All => "all",
        })
    }
}

impl FromStr for ChannelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "original" => Ok(ChannelType::Original),
            "2" | "all" | "rebranded" => Ok(ChannelType::All),
            other => Err(format!(
                "unknown channel type '{}'. Use 1/original or 2/all.",
                other
            )),
        }
    }
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    channel_id: &'a str,
    #[serde(rename = "type")]
    channel_type: &'a str,
}

/// Submit `channel_id` for review. Returns the endpoint's response text.
pub async fn submit_channel(
    config: &RegisterConfig,
    channel_id: &str,
    channel_type: ChannelType,
) -> Result<String> {
    if channel_id.trim().is_empty() {
        bail!("Missing required fields");
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let response = client
        .post(&config.endpoint)
        .json(&SubmitBody {
            channel_id,
            channel_type: channel_type.code(),
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        bail!(
            "Failed to submit channel: {}",
            status.canonical_reason().unwrap_or(status.as_str())
        );
    }

    info!(channel_id, channel_type = %channel_type, "channel submitted");
    Ok(response.text().await.unwrap_or_default())
}

/// Resolve `channel_url` and submit the resulting id.
///
/// Returns the resolved id and the endpoint's response text.
pub async fn register_channel(
    register: &RegisterConfig,
    youtube: &YoutubeConfig,
    channel_url: &str,
    channel_type: ChannelType,
) -> Result<(String, String)> {
    let channel_id = fetch_channel_id(channel_url, Duration::from_secs(youtube.timeout_secs)).await?;
    let response = submit_channel(register, &channel_id, channel_type).await?;
    Ok((channel_id, response))
}

/// Run `vtdash submit`: submit a known channel id.
pub async fn run_submit(config: &Config, channel_id: &str, channel_type: ChannelType) -> Result<()> {
    let response = submit_channel(&config.register, channel_id, channel_type).await?;
    println!("Submitted {} as {} VTuber.", channel_id, channel_type);
    if !response.trim().is_empty() {
        println!("{}", response.trim());
    }
    Ok(())
}

/// Run `vtdash register`: resolve a channel URL, then submit it.
pub async fn run_register(
    config: &Config,
    channel_url: &str,
    channel_type: ChannelType,
) -> Result<()> {
    let (channel_id, response) =
        register_channel(&config.register, &config.youtube, channel_url, channel_type).await?;
    println!("Resolved {} → {}", channel_url, channel_id);
    println!("Submitted {} as {} VTuber.", channel_id, channel_type);
    if !response.trim().is_empty() {
        println!("{}", response.trim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_type_parse() {
        assert_eq!("1".parse::<ChannelType>().unwrap(), ChannelType::Original);
        assert_eq!("Original".parse::<ChannelType>().unwrap(), ChannelType::Original);
        assert_eq!("2".parse::<ChannelType>().unwrap(), ChannelType::All);
        assert_eq!("all".parse::<ChannelType>().unwrap(), ChannelType::All);
        assert!("3".parse::<ChannelType>().is_err());
    }

    #[test]
    fn test_channel_type_codes() {
        assert_eq!(ChannelType::Original.code(), "1");
        assert_eq!(ChannelType::All.code(), "2");
    }

    #[test]
    fn test_submit_body_shape() {
        let body = SubmitBody {
            channel_id: "UCabc",
            channel_type: ChannelType::All.code(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"channel_id": "UCabc", "type": "2"}));
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_id() {
        let err = submit_channel(&RegisterConfig::default(), " ", ChannelType::Original)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Missing required fields"));
    }
}
