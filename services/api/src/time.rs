//! Relative timestamps for threads and comments

use chrono::{DateTime, Utc};

/// Shown when a timestamp is missing or cannot be parsed
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Parse a backend timestamp (RFC 3339, then RFC 2822)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Human-readable age of `date` relative to `now`
///
/// Timestamps in the future count as "Just now".
pub fn time_ago(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return UNKNOWN_DATE.to_string();
    };

    let seconds = (now - date).num_seconds().max(0);
    if seconds < 5 {
        return "Just now".to_string();
    }
    if seconds < 60 {
        return plural(seconds, "second");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = hours / 24;
    if days < 7 {
        return plural(days, "day");
    }

    let weeks = days / 7;
    if weeks < 4 {
        return plural(weeks, "week");
    }

    // 28 and 29 days are past four weeks but short of a 30-day month
    let months = (days / 30).max(1);
    if months < 12 {
        return plural(months, "month");
    }

    plural((days / 365).max(1), "year")
}

/// [`time_ago`] for a raw backend field
pub fn time_ago_raw(raw: Option<&str>, now: DateTime<Utc>) -> String {
    time_ago(raw.and_then(parse_timestamp), now)
}
