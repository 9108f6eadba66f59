//! Rank stage: subscriber leaderboards per category.
//!
//! Ranks are computed over the full, unfiltered snapshot so they reflect a
//! channel's global standing, not its position in the current view.
//!
//! # Algorithm
//!
//! 1. Partition the input by `is_rebranded`, preserving input order.
//! 2. Stable-sort each partition by `subscribers` descending.
//! 3. Assign `index + 1` as the rank.
//!
//! Equal subscriber counts do not share a rank: ties get consecutive ranks
//! in input order (1, 2, 3 rather than 1, 1, 3).

use serde::Serialize;
use std::collections::HashMap;

use crate::models::Channel;

/// Two independent rank tables keyed by `channel_id`.
///
/// A channel appears in exactly one table. A missing entry means "unranked
/// in that category", never rank zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriberRanks {
    pub original: HashMap<String, u32>,
    pub rebranded: HashMap<String, u32>,
}

impl SubscriberRanks {
    /// Rank of a channel within the original-VTuber category.
    pub fn original_rank(&self, channel_id: &str) -> Option<u32> {
        self.original.get(channel_id).copied()
    }

    /// Rank of a channel within the rebranded category.
    pub fn rebranded_rank(&self, channel_id: &str) -> Option<u32> {
        self.rebranded.get(channel_id).copied()
    }

    /// Rank of `channel` within its own category.
    pub fn rank_of(&self, channel: &Channel) -> Option<u32> {
        if channel.is_rebranded {
            self.rebranded_rank(&channel.channel_id)
        } else {
            self.original_rank(&channel.channel_id)
        }
    }

    /// Channel ids of one category ordered by rank.
    pub fn leaderboard(&self, rebranded: bool) -> Vec<(&str, u32)> {
        let table = if rebranded {
            &self.rebranded
        } else {
            &self.original
        };
        let mut entries: Vec<(&str, u32)> =
            table.iter().map(|(id, rank)| (id.as_str(), *rank)).collect();
        entries.sort_by_key(|(_, rank)| *rank);
        entries
    }
}

/// Build both rank tables from the full channel list.
pub fn compute_ranks<'a, I>(channels: I) -> SubscriberRanks
where
    I: IntoIterator<Item = &'a Channel>,
{
    let (rebranded, original): (Vec<&Channel>, Vec<&Channel>) =
        channels.into_iter().partition(|ch| ch.is_rebranded);

    SubscriberRanks {
        original: rank_partition(original),
        rebranded: rank_partition(rebranded),
    }
}

fn rank_partition(mut partition: Vec<&Channel>) -> HashMap<String, u32> {
    // `sort_by` is stable: equal counts stay in input order.
    partition.sort_by(|a, b| b.subscribers.cmp(&a.subscribers));

    partition
        .into_iter()
        .enumerate()
        .map(|(i, ch)| (ch.channel_id.clone(), i as u32 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_channel(id: &str, subscribers: u64, rebranded: bool) -> Channel {
        Channel {
            subscribers,
            is_rebranded: rebranded,
            ..Channel::new(id, id.to_uppercase())
        }
    }

    fn sample() -> Vec<Channel> {
        vec![
            make_channel("a", 500, false),
            make_channel("b", 9_000, true),
            make_channel("c", 1_200, false),
            make_channel("d", 300, true),
            make_channel("e", 80_000, false),
            make_channel("f", 9_000, true),
        ]
    }

    #[test]
    fn test_ranks_by_subscribers_descending() {
        let ranks = compute_ranks(&sample());
        assert_eq!(ranks.original_rank("e"), Some(1));
        assert_eq!(ranks.original_rank("c"), Some(2));
        assert_eq!(ranks.original_rank("a"), Some(3));
    }

    #[test]
    fn test_ties_use_input_order() {
        let ranks = compute_ranks(&sample());
        assert_eq!(ranks.rebranded_rank("b"), Some(1));
        assert_eq!(ranks.rebranded_rank("f"), Some(2));
        assert_eq!(ranks.rebranded_rank("d"), Some(3));
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let channels = sample();
        let ranks = compute_ranks(&channels);

        let original: HashSet<&str> = ranks.original.keys().map(String::as_str).collect();
        let rebranded: HashSet<&str> = ranks.rebranded.keys().map(String::as_str).collect();
        assert!(original.is_disjoint(&rebranded));
        assert_eq!(original.len() + rebranded.len(), channels.len());

        for ch in &channels {
            let table = if ch.is_rebranded { &rebranded } else { &original };
            assert!(table.contains(ch.channel_id.as_str()));
        }
    }

    #[test]
    fn test_ranks_are_dense() {
        let channels: Vec<Channel> = (0..7)
            .map(|i| make_channel(&format!("c{}", i), (i % 3) * 100, false))
            .collect();
        let ranks = compute_ranks(&channels);
        let mut assigned: Vec<u32> = ranks.original.values().copied().collect();
        assigned.sort_unstable();
        assert_eq!(assigned, (1..=7).collect::<Vec<u32>>());
    }

    #[test]
    fn test_unranked_in_other_category() {
        let ranks = compute_ranks(&sample());
        assert_eq!(ranks.rebranded_rank("a"), None);
        assert_eq!(ranks.original_rank("b"), None);
    }

    #[test]
    fn test_rank_of_uses_own_category() {
        let channels = sample();
        let ranks = compute_ranks(&channels);
        assert_eq!(ranks.rank_of(&channels[1]), Some(1));
        assert_eq!(ranks.rank_of(&channels[0]), Some(3));
    }

    #[test]
    fn test_leaderboard_order() {
        let ranks = compute_ranks(&sample());
        let board: Vec<&str> = ranks.leaderboard(true).into_iter().map(|(id, _)| id).collect();
        assert_eq!(board, vec!["b", "f", "d"]);
    }

    #[test]
    fn test_empty_input() {
        let ranks = compute_ranks(&Vec::<Channel>::new());
        assert!(ranks.original.is_empty());
        assert!(ranks.rebranded.is_empty());
    }
}
