//! TOML configuration.
//!
//! Only `[source]` is required; every other section falls back to defaults.
//! See `config/vtdash.example.toml` for a complete file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub register: RegisterConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the channel list comes from.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// `"http"` (aggregation API) or `"file"` (local JSON dump).
    #[serde(default = "default_source_kind")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_source_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Poll interval of `vtdash serve`.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_source_kind() -> String {
    "http".to_string()
}
fn default_source_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_refresh_secs() -> u64 {
    600
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActivityConfig {
    /// A channel with no upload in this many days is inactive.
    #[serde(default = "default_inactive_after_days")]
    pub inactive_after_days: i64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            inactive_after_days: default_inactive_after_days(),
        }
    }
}

fn default_inactive_after_days() -> i64 {
    vtdash_core::activity::DEFAULT_ACTIVE_WINDOW_DAYS
}

/// Upper bound for `inactive_after_days` (about a century).
pub const MAX_INACTIVE_AFTER_DAYS: i64 = 36_500;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    vtdash_core::models::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct YoutubeConfig {
    #[serde(default = "default_feed_base_url")]
    pub feed_base_url: String,
    #[serde(default = "default_feed_limit")]
    pub default_limit: usize,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            feed_base_url: default_feed_base_url(),
            default_limit: default_feed_limit(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_feed_base_url() -> String {
    "https://www.youtube.com/feeds/videos.xml".to_string()
}
fn default_feed_limit() -> usize {
    10
}
fn default_http_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegisterConfig {
    /// Cloud function that queues channel submissions for manual review.
    #[serde(default = "default_register_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            endpoint: default_register_endpoint(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_register_endpoint() -> String {
    "https://us-central1-thaivtuberranking.cloudfunctions.net/postChannelRequest".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    match config.source.kind.as_str() {
        "http" => {
            if config.source.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                bail!("source.url must be set when source.kind is 'http'");
            }
        }
        "file" => {
            if config.source.path.is_none() {
                bail!("source.path must be set when source.kind is 'file'");
            }
        }
        other => bail!(
            "Unknown source kind: '{}'. Must be http or file.",
            other
        ),
    }

    if config.source.refresh_secs == 0 {
        bail!("source.refresh_secs must be >= 1");
    }

    if config.activity.inactive_after_days < 1 {
        bail!("activity.inactive_after_days must be >= 1");
    }
    if config.activity.inactive_after_days > MAX_INACTIVE_AFTER_DAYS {
        bail!(
            "activity.inactive_after_days must be <= {}",
            MAX_INACTIVE_AFTER_DAYS
        );
    }

    if config.dashboard.page_size == 0 {
        bail!("dashboard.page_size must be >= 1");
    }

    if config.youtube.default_limit == 0 {
        bail!("youtube.default_limit must be >= 1");
    }

    Ok(config)
}
