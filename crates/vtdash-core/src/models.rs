//! Core data models for the dashboard.
//!
//! [`Channel`] mirrors a record of the third-party aggregation API and is
//! read-only to the pipeline. The remaining types are the small pieces of
//! UI state (filters, sort selection, pagination) that parameterize it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A YouTube channel tracked by the dashboard.
///
/// `channel_id` is unique within one store snapshot. Timestamps are kept as
/// the raw strings the API returns; use [`Channel::published_at_millis`] and
/// [`Channel::last_video_at_millis`] for comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    pub title: String,
    #[serde(default)]
    pub subscribers: u64,
    #[serde(default)]
    pub total_views: u64,
    /// Channel creation time (ISO 8601).
    #[serde(default)]
    pub published_at: Option<String>,
    /// Time of the most recent upload (ISO 8601). Drives activity.
    #[serde(default)]
    pub last_published_video_at: Option<String>,
    /// True when the channel did not start out as a VTuber channel.
    #[serde(default)]
    pub is_rebranded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Channel {
    /// A channel with zero counts, no timestamps, and `is_rebranded == false`.
    pub fn new(channel_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: title.into(),
            subscribers: 0,
            total_views: 0,
            published_at: None,
            last_published_video_at: None,
            is_rebranded: false,
            thumbnail_image_url: None,
            description: None,
        }
    }

    /// Creation time as epoch milliseconds; absent or unparseable is `0`.
    pub fn published_at_millis(&self) -> i64 {
        timestamp_millis(self.published_at.as_deref())
    }

    /// Last upload time as epoch milliseconds; absent or unparseable is `0`.
    pub fn last_video_at_millis(&self) -> i64 {
        timestamp_millis(self.last_published_video_at.as_deref())
    }
}

/// Response envelope of the channel aggregation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsResponse {
    pub result: Vec<Channel>,
}

/// Parse an API timestamp.
///
/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC),
/// and a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp_millis(value: Option<&str>) -> i64 {
    value
        .and_then(parse_timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// Filter controls of the channel list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    /// Case-insensitive title substring. Empty disables the filter.
    pub search: String,
    /// Restrict to channels with `is_rebranded == false`.
    pub show_original_vtuber: bool,
    /// Include channels that fail the activity predicate.
    pub show_inactive: bool,
}

impl Default for DashboardFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            show_original_vtuber: true,
            show_inactive: false,
        }
    }
}

/// Sortable channel attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Subscribers,
    TotalViews,
    PublishedAt,
    LastPublishedVideoAt,
    Title,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Subscribers,
        SortField::TotalViews,
        SortField::PublishedAt,
        SortField::LastPublishedVideoAt,
        SortField::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Subscribers => "subscribers",
            SortField::TotalViews => "total_views",
            SortField::PublishedAt => "published_at",
            SortField::LastPublishedVideoAt => "last_published_video_at",
            SortField::Title => "title",
        }
    }

    /// True for the two timestamp attributes.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, SortField::PublishedAt | SortField::LastPublishedVideoAt)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "subscribers" => Ok(SortField::Subscribers),
            "total_views" | "views" => Ok(SortField::TotalViews),
            "published_at" => Ok(SortField::PublishedAt),
            "last_published_video_at" | "last_video" => Ok(SortField::LastPublishedVideoAt),
            "title" => Ok(SortField::Title),
            other => Err(format!(
                "unknown sort field '{}'; expected one of: subscribers, total_views, published_at, last_published_video_at, title",
                other
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'; use asc or desc", other)),
        }
    }
}

/// Current sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Subscribers,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    /// Column-header click: re-selecting the current field toggles the
    /// direction, a different field always starts descending.
    pub fn select(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                order: self.order.toggled(),
            }
        } else {
            Self {
                field,
                order: SortOrder::Desc,
            }
        }
    }
}

/// Pagination position. `total_items` is derived, never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// 1-based page number.
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 25;

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_items: 0,
        }
    }
}

impl PaginationState {
    /// `ceil(total_items / page_size)`; zero for an empty list or zero page size.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.page_size)
    }

    /// Zero-based offset of the first row on the current page.
    ///
    /// Saturates at `usize::MAX` for pages far past the end.
    pub fn start_index(&self) -> usize {
        self.current_page.saturating_sub(1).saturating_mul(self.page_size)
    }
}
