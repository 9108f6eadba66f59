//! Dashboard queries and the `vtdash list` / `vtdash stats` commands.
//!
//! [`DashboardQuery`] is the flat, string-typed form of a dashboard state
//! shared by the CLI flags and the HTTP query string. It is turned into a
//! [`DashboardState`] with the same transitions the interactive dashboard
//! uses, so page resets behave identically everywhere.

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use vtdash_core::sort::sort_channels;
use vtdash_core::stats::compute_stats;
use vtdash_core::{
    derive_view, Channel, ChannelSnapshot, DashboardFilters, DashboardState, DashboardStats,
    DashboardView, RecencyActivity, SortField, SortOrder, SortState,
};

use crate::channels::create_store;
use crate::config::Config;
use crate::format::{format_number, format_relative, truncate};

/// A dashboard state as received from the outside world.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub show_original_vtuber: Option<bool>,
    pub show_inactive: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl DashboardQuery {
    /// Build the state this query describes.
    ///
    /// Missing fields take the dashboard defaults. Naming a sort field without
    /// an order sorts descending. Errors describe the offending parameter.
    pub fn to_state(&self, default_page_size: usize) -> Result<DashboardState, String> {
        let defaults = DashboardFilters::default();
        let filters = DashboardFilters {
            search: self.search.clone().unwrap_or_default(),
            show_original_vtuber: self
                .show_original_vtuber
                .unwrap_or(defaults.show_original_vtuber),
            show_inactive: self.show_inactive.unwrap_or(defaults.show_inactive),
        };

        let field = match self.sort.as_deref() {
            Some(s) => Some(s.parse::<SortField>()?),
            None => None,
        };
        let order = match self.order.as_deref() {
            Some(s) => Some(s.parse::<SortOrder>()?),
            None => None,
        };
        let sort = SortState {
            field: field.unwrap_or(SortState::default().field),
            order: order.unwrap_or(SortOrder::Desc),
        };

        let page_size = self.page_size.unwrap_or(default_page_size);
        if page_size == 0 {
            return Err("pageSize must be >= 1".to_string());
        }

        let mut state = DashboardState::default()
            .with_filters(filters)
            .with_page_size(page_size);
        state.sort = sort;
        Ok(state.with_page(self.page.unwrap_or(1)))
    }
}

/// Aggregate view served by `vtdash stats` and `/api/stats`.
///
/// Only the rebrand filter applies here; search text and activity do not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub show_original_vtuber: bool,
    pub fetched_at: String,
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub top_channels: Vec<TopChannel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopChannel {
    /// Position by subscribers within the report's scope.
    pub position: usize,
    /// Rank within the channel's own table (original or rebranded).
    pub rank: Option<u32>,
    pub is_rebranded: bool,
    pub channel_id: String,
    pub title: String,
    pub subscribers: u64,
}

const TOP_CHANNELS: usize = 10;

/// Summarize `snapshot` for the analytics view.
pub fn build_stats_report(
    snapshot: &ChannelSnapshot,
    show_original_vtuber: bool,
    activity: &RecencyActivity,
) -> StatsReport {
    let channels: Vec<&Channel> = snapshot
        .channels()
        .iter()
        .filter(|ch| !show_original_vtuber || !ch.is_rebranded)
        .collect();
    let stats = compute_stats(channels.iter().copied(), activity);

    let top_channels = sort_channels(channels, SortField::Subscribers, SortOrder::Desc)
        .into_iter()
        .take(TOP_CHANNELS)
        .enumerate()
        .map(|(i, ch)| TopChannel {
            position: i + 1,
            rank: snapshot.ranks().rank_of(ch),
            is_rebranded: ch.is_rebranded,
            channel_id: ch.channel_id.clone(),
            title: ch.title.clone(),
            subscribers: ch.subscribers,
        })
        .collect();

    StatsReport {
        show_original_vtuber,
        fetched_at: snapshot.fetched_at().to_rfc3339(),
        stats,
        top_channels,
    }
}

async fn load_snapshot(config: &Config) -> Result<ChannelSnapshot> {
    let store = create_store(&config.source)?;
    store
        .fetch_snapshot()
        .await
        .map_err(|e| anyhow!("Failed to load channels: {:#}", e))
}

/// Run `vtdash list`: print one page of the dashboard table.
pub async fn run_list(config: &Config, query: &DashboardQuery, json: bool) -> Result<()> {
    let state = query
        .to_state(config.dashboard.page_size)
        .map_err(|e| anyhow!(e))?;
    let snapshot = load_snapshot(config).await?;
    let activity = RecencyActivity::from_now(config.activity.inactive_after_days);
    let view = derive_view(&snapshot, &state, &activity);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_view(&view);
    Ok(())
}

fn print_view(view: &DashboardView) {
    if view.rows.is_empty() {
        println!("No channels.");
        if view.total_items > 0 {
            println!(
                "(page {} of {}, {} channels match)",
                view.page, view.total_pages, view.total_items
            );
        }
        return;
    }

    let now = Utc::now();
    println!(
        "{:>4}  {:>5}  {:<32} {:>8} {:>9}  {:<14} {}",
        "#", "RANK", "CHANNEL", "SUBS", "VIEWS", "LAST VIDEO", ""
    );
    println!("{}", "-".repeat(84));

    for row in &view.rows {
        let rank = row
            .original_rank
            .or(row.rebranded_rank)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".into());
        let mut tags = Vec::new();
        if row.channel.is_rebranded {
            tags.push("rebranded");
        }
        if !row.active {
            tags.push("inactive");
        }
        println!(
            "{:>4}  {:>5}  {:<32} {:>8} {:>9}  {:<14} {}",
            row.position,
            rank,
            truncate(&row.channel.title, 32),
            format_number(row.channel.subscribers),
            format_number(row.channel.total_views),
            format_relative(row.channel.last_published_video_at.as_deref(), now),
            tags.join(",")
        );
    }

    println!();
    println!(
        "Page {} of {} ({} channels, sorted by {} {})",
        view.page, view.total_pages, view.total_items, view.sort.field, view.sort.order
    );
    println!(
        "Subscribers: {}  Views: {}  Active: {}",
        format_number(view.stats.total_subscribers),
        format_number(view.stats.total_views),
        view.stats.active_channels
    );
}

/// Run `vtdash stats`: print totals and the subscriber leaderboard.
pub async fn run_stats(config: &Config, show_original_vtuber: bool, json: bool) -> Result<()> {
    let snapshot = load_snapshot(config).await?;
    let activity = RecencyActivity::from_now(config.activity.inactive_after_days);
    let report = build_stats_report(&snapshot, show_original_vtuber, &activity);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let scope = if show_original_vtuber {
        "original VTubers"
    } else {
        "all VTubers"
    };
    println!("Thai VTuber Stats ({})", scope);
    println!("==============================");
    println!();
    println!("  Channels:            {}", report.stats.total_channels);
    println!("  Active channels:     {}", report.stats.active_channels);
    println!(
        "  Total subscribers:   {} ({})",
        report.stats.total_subscribers,
        format_number(report.stats.total_subscribers)
    );
    println!(
        "  Total views:         {} ({})",
        report.stats.total_views,
        format_number(report.stats.total_views)
    );
    println!(
        "  Average subscribers: {:.1}",
        report.stats.average_subscribers
    );

    if !report.top_channels.is_empty() {
        println!();
        println!("  Top channels:");
        for top in &report.top_channels {
            println!(
                "  {:>4}. {:<32} {:>8}{}",
                top.position,
                truncate(&top.title, 32),
                format_number(top.subscribers),
                if top.is_rebranded { "  (rebranded)" } else { "" }
            );
        }
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_channel(id: &str, subscribers: u64, rebranded: bool) -> Channel {
        Channel {
            subscribers,
            total_views: subscribers * 10,
            is_rebranded: rebranded,
            last_published_video_at: Some("2025-05-30T00:00:00Z".to_string()),
            ..Channel::new(id, id.to_uppercase())
        }
    }

    fn activity() -> RecencyActivity {
        RecencyActivity::new(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), 30)
    }

    #[test]
    fn test_empty_query_is_default_state() {
        let state = DashboardQuery::default().to_state(25).unwrap();
        assert_eq!(state, DashboardState::default());
    }

    #[test]
    fn test_query_fields_applied() {
        let query = DashboardQuery {
            search: Some("aoi".into()),
            show_original_vtuber: Some(false),
            show_inactive: Some(true),
            sort: Some("title".into()),
            order: Some("asc".into()),
            page: Some(3),
            page_size: Some(10),
        };
        let state = query.to_state(25).unwrap();
        assert_eq!(state.filters.search, "aoi");
        assert!(!state.filters.show_original_vtuber);
        assert!(state.filters.show_inactive);
        assert_eq!(state.sort.field, SortField::Title);
        assert_eq!(state.sort.order, SortOrder::Asc);
        assert_eq!(state.pagination.current_page, 3);
        assert_eq!(state.pagination.page_size, 10);
    }

    #[test]
    fn test_sort_field_without_order_is_descending() {
        let query = DashboardQuery {
            sort: Some("total_views".into()),
            ..Default::default()
        };
        let state = query.to_state(25).unwrap();
        assert_eq!(state.sort.field, SortField::TotalViews);
        assert_eq!(state.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_invalid_query_values() {
        let bad_sort = DashboardQuery {
            sort: Some("likes".into()),
            ..Default::default()
        };
        assert!(bad_sort.to_state(25).is_err());

        let bad_size = DashboardQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(bad_size.to_state(25).is_err());
    }

    #[test]
    fn test_stats_report_original_only() {
        let snapshot = ChannelSnapshot::new(vec![
            make_channel("a", 100, false),
            make_channel("b", 500, true),
            make_channel("c", 300, false),
        ]);
        let report = build_stats_report(&snapshot, true, &activity());
        assert_eq!(report.stats.total_channels, 2);
        assert_eq!(report.stats.total_subscribers, 400);
        assert_eq!(report.stats.active_channels, 2);
        let top: Vec<&str> = report
            .top_channels
            .iter()
            .map(|t| t.channel_id.as_str())
            .collect();
        assert_eq!(top, vec!["c", "a"]);
    }

    #[test]
    fn test_stats_report_all_types_merges_tables() {
        let snapshot = ChannelSnapshot::new(vec![
            make_channel("a", 100, false),
            make_channel("b", 500, true),
        ]);
        let report = build_stats_report(&snapshot, false, &activity());
        assert_eq!(report.stats.total_channels, 2);
        assert_eq!(report.top_channels.len(), 2);
        assert_eq!(report.top_channels[0].channel_id, "b");
        assert_eq!(report.top_channels[0].position, 1);
        assert_eq!(report.top_channels[0].rank, Some(1));
        assert_eq!(report.top_channels[1].channel_id, "a");
        assert_eq!(report.top_channels[1].rank, Some(1));
    }
}
