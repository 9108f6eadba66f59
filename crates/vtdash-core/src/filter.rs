//! Filter stage: reduce the channel list by search text, rebrand flag, and
//! activity.
//!
//! The stage is a stable filter. Survivors keep their input order and are
//! returned as borrows of the input records.

use crate::activity::ActivityPredicate;
use crate::models::{Channel, DashboardFilters};

/// Apply `filters` to `channels`, keeping input order.
///
/// A channel survives when all three predicates hold:
///
/// - **search**: `filters.search` is empty, or the lowercased title contains
///   the lowercased search text;
/// - **rebrand**: `show_original_vtuber` is off, or the channel is not rebranded;
/// - **activity**: `show_inactive` is on, or `activity` reports the channel active.
pub fn filter_channels<'a, I, A>(
    channels: I,
    filters: &DashboardFilters,
    activity: &A,
) -> Vec<&'a Channel>
where
    I: IntoIterator<Item = &'a Channel>,
    A: ActivityPredicate + ?Sized,
{
    let needle = filters.search.to_lowercase();

    channels
        .into_iter()
        .filter(|ch| matches_search(&needle, &ch.title))
        .filter(|ch| matches_rebrand(filters.show_original_vtuber, ch.is_rebranded))
        .filter(|ch| filters.show_inactive || activity.is_active(ch))
        .collect()
}

/// `needle` must already be lowercased.
fn matches_search(needle: &str, title: &str) -> bool {
    needle.is_empty() || title.to_lowercase().contains(needle)
}

fn matches_rebrand(show_original_only: bool, is_rebranded: bool) -> bool {
    !show_original_only || !is_rebranded
}
