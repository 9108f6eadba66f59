//! Display helpers for terminal output.

use chrono::{DateTime, Utc};
use vtdash_core::models::parse_timestamp;

/// Compact count: `1.2M`, `45.3K`, or the plain number below one thousand.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Relative time of an API timestamp (e.g. "3 hours ago"), `-` when absent.
///
/// Anything older than a month, and anything in the future, is shown as a
/// date instead.
pub fn format_relative(value: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(ts) = value.and_then(parse_timestamp) else {
        return "-".to_string();
    };

    let delta = (now - ts).num_seconds();
    if delta < 0 {
        return format_date(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_date(ts)
    }
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Cut `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
