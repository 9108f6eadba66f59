//! The list derivation pipeline.
//!
//! A [`ChannelSnapshot`] owns one fetched channel list and its subscriber
//! ranks; [`derive_view`] turns a snapshot plus a [`DashboardState`] into
//! the rows and numbers a dashboard renders.
//!
//! # Stages
//!
//! 1. **Rank** the full snapshot (once, when the snapshot is built).
//! 2. **Filter** by search text, rebrand flag, and activity.
//! 3. **Stats** over the filtered list.
//! 4. **Sort** the filtered list by the selected field and order.
//! 5. **Paginate** the sorted list.
//!
//! Nothing is cached across calls except the ranks held by the snapshot.
//! Calling `derive_view` twice with the same inputs yields equal views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity::ActivityPredicate;
use crate::filter::filter_channels;
use crate::models::{Channel, SortState};
use crate::paginate::paginate;
use crate::rank::{compute_ranks, SubscriberRanks};
use crate::sort::sort_channels;
use crate::state::DashboardState;
use crate::stats::{compute_stats, DashboardStats};

/// One fetched channel list together with its rank tables.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    channels: Vec<Channel>,
    ranks: SubscriberRanks,
    fetched_at: DateTime<Utc>,
}

impl ChannelSnapshot {
    /// Build a snapshot, computing ranks over the full list.
    pub fn new(channels: Vec<Channel>) -> Self {
        Self::with_fetched_at(channels, Utc::now())
    }

    pub fn with_fetched_at(channels: Vec<Channel>, fetched_at: DateTime<Utc>) -> Self {
        let ranks = compute_ranks(&channels);
        Self {
            channels,
            ranks,
            fetched_at,
        }
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn ranks(&self) -> &SubscriberRanks {
        &self.ranks
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn find(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.iter().find(|ch| ch.channel_id == channel_id)
    }
}

/// A channel on the current page, annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRow {
    /// 1-based position in the sorted, filtered list.
    pub position: usize,
    #[serde(flatten)]
    pub channel: Channel,
    pub original_rank: Option<u32>,
    pub rebranded_rank: Option<u32>,
    pub active: bool,
}

/// Everything needed to render one dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub page: usize,
    pub page_size: usize,
    /// Size of the filtered list.
    pub total_items: usize,
    pub total_pages: usize,
    pub sort: SortState,
    pub rows: Vec<ChannelRow>,
    /// Aggregates over the filtered list.
    pub stats: DashboardStats,
}

/// Run the full pipeline for `state` over `snapshot`.
pub fn derive_view<A>(
    snapshot: &ChannelSnapshot,
    state: &DashboardState,
    activity: &A,
) -> DashboardView
where
    A: ActivityPredicate + ?Sized,
{
    let filtered = filter_channels(snapshot.channels(), &state.filters, activity);
    let stats = compute_stats(filtered.iter().copied(), activity);
    let sorted = sort_channels(filtered.iter().copied(), state.sort.field, state.sort.order);

    let pagination = state.clone().with_total_items(sorted.len()).pagination;
    let page = paginate(&sorted, pagination.current_page, pagination.page_size);
    let start = pagination.start_index();

    let rows = page
        .iter()
        .enumerate()
        .map(|(i, ch)| ChannelRow {
            position: start.saturating_add(i + 1),
            channel: (*ch).clone(),
            original_rank: snapshot.ranks().original_rank(&ch.channel_id),
            rebranded_rank: snapshot.ranks().rebranded_rank(&ch.channel_id),
            active: activity.is_active(ch),
        })
        .collect();

    DashboardView {
        page: pagination.current_page,
        page_size: pagination.page_size,
        total_items: pagination.total_items,
        total_pages: pagination.total_pages(),
        sort: state.sort,
        rows,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DashboardFilters, SortField, SortOrder};

    fn make_channel(id: &str, subscribers: u64, views: u64, rebranded: bool) -> Channel {
        Channel {
            subscribers,
            total_views: views,
            is_rebranded: rebranded,
            last_published_video_at: Some("2025-06-01T00:00:00Z".to_string()),
            ..Channel::new(id, format!("Channel {}", id))
        }
    }

    fn always_active(_: &Channel) -> bool {
        true
    }

    fn five_channels() -> ChannelSnapshot {
        ChannelSnapshot::new(vec![
            make_channel("a", 200, 2_000, false),
            make_channel("b", 900, 9_000, true),
            make_channel("c", 50, 500, false),
            make_channel("d", 4_000, 40_000, true),
            make_channel("e", 700, 7_000, false),
        ])
    }

    fn row_ids(view: &DashboardView) -> Vec<&str> {
        view.rows.iter().map(|r| r.channel.channel_id.as_str()).collect()
    }

    #[test]
    fn test_original_only_sorted_and_paged() {
        let snapshot = five_channels();
        let state = DashboardState::default()
            .with_filters(DashboardFilters {
                search: String::new(),
                show_original_vtuber: true,
                show_inactive: true,
            })
            .with_page_size(2);

        let filtered = filter_channels(snapshot.channels(), &state.filters, &always_active);
        let filtered_ids: Vec<&str> = filtered.iter().map(|c| c.channel_id.as_str()).collect();
        assert_eq!(filtered_ids, vec!["a", "c", "e"]);

        let view = derive_view(&snapshot, &state, &always_active);
        assert_eq!(view.total_items, 3);
        assert_eq!(view.total_pages, 2);
        assert_eq!(row_ids(&view), vec!["e", "a"]);
    }

    #[test]
    fn test_rows_carry_global_ranks_and_positions() {
        let snapshot = five_channels();
        let state = DashboardState::default()
            .with_filters(DashboardFilters {
                search: "Channel".to_string(),
                show_original_vtuber: false,
                show_inactive: true,
            })
            .with_page_size(2)
            .with_page(2);

        let view = derive_view(&snapshot, &state, &always_active);
        assert_eq!(row_ids(&view), vec!["e", "a"]);
        assert_eq!(view.rows[0].position, 3);
        assert_eq!(view.rows[1].position, 4);
        assert_eq!(view.rows[0].original_rank, Some(1));
        assert_eq!(view.rows[0].rebranded_rank, None);
    }

    #[test]
    fn test_ranks_ignore_filters() {
        let snapshot = five_channels();
        let state = DashboardState::default().with_filters(DashboardFilters {
            search: "Channel c".to_string(),
            show_original_vtuber: true,
            show_inactive: true,
        });
        let view = derive_view(&snapshot, &state, &always_active);
        assert_eq!(row_ids(&view), vec!["c"]);
        assert_eq!(view.rows[0].original_rank, Some(3));
    }

    #[test]
    fn test_stats_follow_filters_not_pages() {
        let snapshot = five_channels();
        let state = DashboardState::default()
            .with_filters(DashboardFilters {
                search: String::new(),
                show_original_vtuber: true,
                show_inactive: true,
            })
            .with_page_size(1);
        let view = derive_view(&snapshot, &state, &always_active);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.stats.total_channels, 3);
        assert_eq!(view.stats.total_subscribers, 950);
        assert_eq!(view.stats.total_views, 9_500);
    }

    #[test]
    fn test_sort_selection_applies() {
        let snapshot = five_channels();
        let state = DashboardState::default()
            .with_filters(DashboardFilters {
                search: String::new(),
                show_original_vtuber: false,
                show_inactive: true,
            })
            .with_sort_field(SortField::Subscribers);
        assert_eq!(state.sort.order, SortOrder::Asc);

        let view = derive_view(&snapshot, &state, &always_active);
        assert_eq!(row_ids(&view), vec!["c", "a", "e", "b", "d"]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let snapshot = five_channels();
        let state = DashboardState::default().with_page(9);
        let view = derive_view(&snapshot, &state, &always_active);
        assert!(view.rows.is_empty());
        assert_eq!(view.page, 9);
    }

    #[test]
    fn test_huge_page_is_empty() {
        let snapshot = five_channels();
        let state = DashboardState::default().with_page(usize::MAX);
        let view = derive_view(&snapshot, &state, &always_active);
        assert!(view.rows.is_empty());
        assert_eq!(view.page, usize::MAX);
        assert_eq!(view.total_items, 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ChannelSnapshot::new(Vec::new());
        let view = derive_view(&snapshot, &DashboardState::default(), &always_active);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.stats.total_channels, 0);
        assert_eq!(view.stats.average_subscribers, 0.0);
    }

    #[test]
    fn test_inactive_hidden_by_default() {
        let mut channels = vec![make_channel("a", 10, 0, false)];
        channels.push(Channel {
            last_published_video_at: None,
            ..make_channel("z", 99, 0, false)
        });
        let snapshot = ChannelSnapshot::new(channels);
        let activity = |ch: &Channel| ch.last_published_video_at.is_some();
        let view = derive_view(&snapshot, &DashboardState::default(), &activity);
        assert_eq!(row_ids(&view), vec!["a"]);
        assert!(view.rows[0].active);
    }

    #[test]
    fn test_derive_view_is_repeatable() {
        let snapshot = five_channels();
        let state = DashboardState::default().with_page_size(2);
        let first = derive_view(&snapshot, &state, &always_active);
        let second = derive_view(&snapshot, &state, &always_active);
        assert_eq!(first, second);
    }
}
