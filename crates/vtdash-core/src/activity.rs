//! Channel activity predicate.
//!
//! Whether a channel is "active" is a recency policy over
//! `last_published_video_at`. The filter and stats stages only see the
//! [`ActivityPredicate`] trait, so the threshold (and the notion of "now")
//! stays with the caller.

use chrono::{DateTime, Duration, Utc};

use crate::models::{parse_timestamp, Channel};

/// Default recency window: a channel that uploaded within the last 30 days
/// is active.
pub const DEFAULT_ACTIVE_WINDOW_DAYS: i64 = 30;

/// Decides whether a channel counts as active.
pub trait ActivityPredicate {
    fn is_active(&self, channel: &Channel) -> bool;
}

impl<F> ActivityPredicate for F
where
    F: Fn(&Channel) -> bool,
{
    fn is_active(&self, channel: &Channel) -> bool {
        self(channel)
    }
}

/// Recency-based activity: active iff the last upload is no older than
/// `window` relative to `now`.
///
/// Channels with no (or an unparseable) last upload time are inactive.
/// Uploads dated after `now` count as active.
#[derive(Debug, Clone, Copy)]
pub struct RecencyActivity {
    pub now: DateTime<Utc>,
    pub window: Duration,
}

impl RecencyActivity {
    /// Windows too large for a [`Duration`] clamp to [`Duration::MAX`].
    pub fn new(now: DateTime<Utc>, window_days: i64) -> Self {
        Self {
            now,
            window: Duration::try_days(window_days).unwrap_or(Duration::MAX),
        }
    }

    /// Recency window of `window_days` measured from the current time.
    pub fn from_now(window_days: i64) -> Self {
        Self::new(Utc::now(), window_days)
    }
}

impl Default for RecencyActivity {
    fn default() -> Self {
        Self::from_now(DEFAULT_ACTIVE_WINDOW_DAYS)
    }
}

impl ActivityPredicate for RecencyActivity {
    fn is_active(&self, channel: &Channel) -> bool {
        match channel
            .last_published_video_at
            .as_deref()
            .and_then(parse_timestamp)
        {
            Some(last) => self.now.signed_duration_since(last) <= self.window,
            None => false,
        }
    }
}
