//! Sort stage: order the filtered list by one attribute.
//!
//! Keys are extracted once per channel before sorting. Timestamps become
//! epoch milliseconds (missing or unparseable → `0`, so they sort earliest)
//! and titles are lowercased.
//!
//! The sort is stable in both directions: channels whose keys compare equal
//! keep their input order whether the order is `asc` or `desc`.

use std::cmp::Ordering;

use crate::models::{Channel, SortField, SortOrder};

/// Comparable value extracted from a channel for one [`SortField`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Count(u64),
    /// Epoch milliseconds.
    Instant(i64),
    /// Lowercased text.
    Text(String),
}

/// Extract the sort key of `channel` for `field`.
pub fn sort_key(channel: &Channel, field: SortField) -> SortKey {
    match field {
        SortField::Subscribers => SortKey::Count(channel.subscribers),
        SortField::TotalViews => SortKey::Count(channel.total_views),
        SortField::PublishedAt => SortKey::Instant(channel.published_at_millis()),
        SortField::LastPublishedVideoAt => SortKey::Instant(channel.last_video_at_millis()),
        SortField::Title => SortKey::Text(channel.title.to_lowercase()),
    }
}

/// Return a new ordering of `channels`; the input is left untouched.
pub fn sort_channels<'a, I>(channels: I, field: SortField, order: SortOrder) -> Vec<&'a Channel>
where
    I: IntoIterator<Item = &'a Channel>,
{
    let mut keyed: Vec<(SortKey, &'a Channel)> = channels
        .into_iter()
        .map(|ch| (sort_key(ch, field), ch))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a, b, order));

    keyed.into_iter().map(|(_, ch)| ch).collect()
}

fn compare(a: &SortKey, b: &SortKey, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => a.cmp(b),
        SortOrder::Desc => b.cmp(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_channel(id: &str, title: &str, subscribers: u64, published: Option<&str>) -> Channel {
        Channel {
            subscribers,
            total_views: subscribers * 10,
            published_at: published.map(str::to_string),
            ..Channel::new(id, title)
        }
    }

    fn sample() -> Vec<Channel> {
        vec![
            make_channel("a", "banana", 300, Some("2021-03-01T00:00:00Z")),
            make_channel("b", "Apple", 1_000, None),
            make_channel("c", "cherry", 300, Some("2019-01-01T00:00:00Z")),
            make_channel("d", "apricot", 50, Some("2023-07-15T00:00:00Z")),
        ]
    }

    fn ids(list: &[&Channel]) -> Vec<String> {
        list.iter().map(|c| c.channel_id.clone()).collect()
    }

    #[test]
    fn test_subscribers_desc_is_monotonic() {
        let channels = sample();
        let out = sort_channels(&channels, SortField::Subscribers, SortOrder::Desc);
        for pair in out.windows(2) {
            assert!(pair[0].subscribers >= pair[1].subscribers);
        }
    }

    #[test]
    fn test_equal_keys_keep_input_order_both_ways() {
        let channels = sample();
        let desc = sort_channels(&channels, SortField::Subscribers, SortOrder::Desc);
        assert_eq!(ids(&desc), vec!["b", "a", "c", "d"]);

        let asc = sort_channels(&channels, SortField::Subscribers, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_missing_timestamp_sorts_earliest() {
        let channels = sample();
        let asc = sort_channels(&channels, SortField::PublishedAt, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["b", "c", "a", "d"]);

        let desc = sort_channels(&channels, SortField::PublishedAt, SortOrder::Desc);
        assert_eq!(ids(&desc).last().map(String::as_str), Some("b"));
    }

    #[test]
    fn test_title_is_case_insensitive() {
        let channels = sample();
        let asc = sort_channels(&channels, SortField::Title, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_total_views() {
        let channels = sample();
        let desc = sort_channels(&channels, SortField::TotalViews, SortOrder::Desc);
        assert_eq!(ids(&desc)[0], "b");
    }

    #[test]
    fn test_input_not_modified() {
        let channels = sample();
        let before = channels.clone();
        let _ = sort_channels(&channels, SortField::Title, SortOrder::Desc);
        assert_eq!(channels, before);
    }

    #[test]
    fn test_sort_key_extraction() {
        let ch = make_channel("x", "MiXeD", 7, None);
        assert_eq!(sort_key(&ch, SortField::Title), SortKey::Text("mixed".to_string()));
        assert_eq!(sort_key(&ch, SortField::PublishedAt), SortKey::Instant(0));
        assert_eq!(sort_key(&ch, SortField::Subscribers), SortKey::Count(7));
    }
}
