//! Date and time helpers for API timestamps.
//!
//! The API sends ISO 8601 strings (`createdAt`, `updatedAt`, `respondedAt`);
//! these helpers turn them into short human-readable labels.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Date format used when a timestamp is older than a month
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse an API timestamp.
///
/// Accepts RFC 3339 (`2025-01-15T14:30:00.000Z`) and naive ISO 8601 without a
/// zone, which is read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a timestamp relative to `now` ("today", "yesterday", "3 days ago").
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let at_local = at.with_timezone(&Local).date_naive();
    let now_local = now.with_timezone(&Local).date_naive();
    let days = (now_local - at_local).num_days();

    match days {
        d if d < 0 => at_local.format(DISPLAY_DATE_FORMAT).to_string(),
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d <= 30 => format!("{} days ago", d),
        _ => at_local.format(DISPLAY_DATE_FORMAT).to_string(),
    }
}

/// Format an optional API timestamp string relative to the current time.
///
/// Unparseable input is returned unchanged; a missing value becomes "-".
pub fn format_human_timestamp(value: Option<&str>) -> String {
    match value {
        Some(raw) => match parse_timestamp(raw) {
            Some(at) => format_relative(at, Utc::now()),
            None => raw.to_string(),
        },
        None => "-".to_string(),
    }
}
