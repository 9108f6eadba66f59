//! YouTube Atom feed reader.
//!
//! YouTube publishes the latest uploads of every channel (and the entries of
//! every public playlist) as an Atom document at
//! `https://www.youtube.com/feeds/videos.xml?channel_id=...` or
//! `...?playlist_id=...`. [`parse_feed`] turns that document into
//! [`FeedItem`]s; [`FeedClient`] fetches it.
//!
//! Missing elements become empty strings or zero, matching how the feed
//! omits statistics for premieres and private entries.

use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::{Config, YoutubeConfig};
use crate::format::{format_number, format_relative};

/// Errors from fetching or parsing a feed.
#[derive(Debug)]
pub enum FeedError {
    /// The request could not be sent or the body could not be read.
    Http(String),
    /// YouTube answered with a non-success status.
    Status(u16),
    /// The body was not a well-formed feed.
    Parse(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Http(e) => write!(f, "feed request failed: {}", e),
            FeedError::Status(code) => write!(f, "Failed to fetch YouTube feed: {}", code),
            FeedError::Parse(e) => write!(f, "feed parse failed: {}", e),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Http(e.to_string())
    }
}

/// Which feed to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Channel(String),
    Playlist(String),
}

impl FeedSource {
    fn query(&self) -> (&'static str, &str) {
        match self {
            FeedSource::Channel(id) => ("channel_id", id),
            FeedSource::Playlist(id) => ("playlist_id", id),
        }
    }
}

/// One video entry of a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Atom entry id, e.g. `yt:video:dQw4w9WgXcQ`.
    pub id: String,
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub published: String,
    pub updated: String,
    pub author: String,
    pub views: u64,
    pub rating: f64,
    pub youtube_id: String,
    /// Set for entries read from a playlist feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
}

/// Parse an Atom feed document, keeping at most `limit` entries.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<FeedItem>, FeedError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<FeedItem> = None;
    let mut path: Vec<String> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                if name == "entry" {
                    current = Some(FeedItem::default());
                }
                if let Some(item) = current.as_mut() {
                    apply_attributes(item, &name, &e)?;
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                if let Some(item) = current.as_mut() {
                    apply_attributes(item, &element_name(&e), &e)?;
                }
            }
            Ok(Event::Text(te)) => {
                if let Some(item) = current.as_mut() {
                    let text = te.unescape().map_err(|e| FeedError::Parse(e.to_string()))?;
                    apply_text(item, &path, &text);
                }
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("entry") {
                    if let Some(mut item) = current.take() {
                        if items.len() >= limit {
                            break;
                        }
                        item.youtube_id = item.video_id.clone();
                        items.push(item);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, FeedError> {
    match e.try_get_attribute(key) {
        Ok(Some(attr)) => attr
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|e| FeedError::Parse(e.to_string())),
        Ok(None) => Ok(None),
        Err(e) => Err(FeedError::Parse(e.to_string())),
    }
}

fn apply_attributes(item: &mut FeedItem, name: &str, e: &BytesStart<'_>) -> Result<(), FeedError> {
    match name {
        "media:thumbnail" => {
            if let Some(url) = attribute(e, "url")? {
                item.thumbnail = url;
            }
        }
        "media:statistics" => {
            item.views = attribute(e, "views")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
        }
        "media:starRating" => {
            item.rating = attribute(e, "average")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0);
        }
        _ => {}
    }
    Ok(())
}

fn apply_text(item: &mut FeedItem, path: &[String], text: &str) {
    let Some(leaf) = path.last() else {
        return;
    };
    let parent = path.len().checked_sub(2).map(|i| path[i].as_str());

    match (parent, leaf.as_str()) {
        (Some("entry"), "id") => item.id = text.to_string(),
        (Some("entry"), "yt:videoId") => item.video_id = text.to_string(),
        (Some("entry"), "yt:channelId") => item.channel_id = text.to_string(),
        (Some("entry"), "title") => item.title = text.to_string(),
        (Some("entry"), "published") => item.published = text.to_string(),
        (Some("entry"), "updated") => item.updated = text.to_string(),
        (Some("author"), "name") => item.author = text.to_string(),
        (Some("media:group"), "media:description") => item.description = text.to_string(),
        _ => {}
    }
}

/// HTTP client for YouTube feeds.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
    default_limit: usize,
}

impl FeedClient {
    pub fn new(config: &YoutubeConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.feed_base_url.clone(),
            default_limit: config.default_limit,
        })
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Latest uploads of a channel.
    pub async fn fetch_channel_feed(
        &self,
        channel_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<FeedItem>, FeedError> {
        self.fetch(&FeedSource::Channel(channel_id.to_string()), limit)
            .await
    }

    /// Entries of a public playlist, tagged with `playlist_id`.
    pub async fn fetch_playlist_feed(
        &self,
        playlist_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<FeedItem>, FeedError> {
        self.fetch(&FeedSource::Playlist(playlist_id.to_string()), limit)
            .await
    }

    /// Fetch and parse a feed. `limit` falls back to the configured default.
    pub async fn fetch(
        &self,
        source: &FeedSource,
        limit: Option<usize>,
    ) -> Result<Vec<FeedItem>, FeedError> {
        let limit = limit.unwrap_or(self.default_limit);
        let (key, id) = source.query();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[(key, id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let mut items = parse_feed(&body, limit)?;

        if let FeedSource::Playlist(playlist_id) = source {
            for item in &mut items {
                item.playlist_id = Some(playlist_id.clone());
            }
        }

        debug!(key, id, count = items.len(), "fetched feed");
        Ok(items)
    }
}

/// Run `vtdash feed` / `vtdash playlist`: print the latest entries.
pub async fn run_feed(
    config: &Config,
    source: FeedSource,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let client = FeedClient::new(&config.youtube)?;
    let items = client.fetch(&source, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No videos.");
        return Ok(());
    }

    let now = chrono::Utc::now();
    for (i, item) in items.iter().enumerate() {
        println!("{}. {}", i + 1, item.title);
        println!(
            "    {} · {} views · {}",
            item.author,
            format_number(item.views),
            format_relative(Some(item.published.as_str()), now)
        );
        println!("    https://www.youtube.com/watch?v={}", item.video_id);
    }

    Ok(())
}
