//! Aggregate statistics over a channel list.
//!
//! Independent of sort order and pagination; the caller decides which list
//! (full snapshot or filtered view) to summarize.

use serde::Serialize;

use crate::activity::ActivityPredicate;
use crate::models::Channel;

/// Totals and averages shown on the dashboard header and analytics page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_channels: usize,
    pub total_subscribers: u64,
    pub total_views: u64,
    /// `total_subscribers / total_channels`, `0.0` for an empty list.
    pub average_subscribers: f64,
    pub active_channels: usize,
}

/// Summarize `channels`.
pub fn compute_stats<'a, I, A>(channels: I, activity: &A) -> DashboardStats
where
    I: IntoIterator<Item = &'a Channel>,
    A: ActivityPredicate + ?Sized,
{
    let mut stats = DashboardStats::default();

    for ch in channels {
        stats.total_channels += 1;
        stats.total_subscribers = stats.total_subscribers.saturating_add(ch.subscribers);
        stats.total_views = stats.total_views.saturating_add(ch.total_views);
        if activity.is_active(ch) {
            stats.active_channels += 1;
        }
    }

    stats.average_subscribers = if stats.total_channels > 0 {
        stats.total_subscribers as f64 / stats.total_channels as f64
    } else {
        0.0
    };

    stats
}
