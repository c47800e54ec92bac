use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Years a caller may supply. Anything outside is treated as unparsable.
const YEAR_RANGE: RangeInclusive<i32> = 1..=9999;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Resolve the optional `time` field of an audit event.
///
/// `None` means the store should use its own clock. A value that cannot be
/// used is logged and treated the same way; it never fails the request.
pub fn resolve(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => match parse_timestamp(s) {
            Some(ts) => Some(ts),
            None => {
                tracing::warn!("Invalid time format '{s}', falling back to current time");
                None
            }
        },
        Some(other) => {
            tracing::warn!("Non-string time value {other}, falling back to current time");
            None
        }
    }
}

/// Parse an extended ISO-8601 date-time. A trailing `Z` is read as `+00:00`;
/// values without an offset are taken as UTC. Years outside 1..=9999 are
/// rejected.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    parse_any(input).filter(|ts| YEAR_RANGE.contains(&ts.year()))
}

fn parse_any(input: &str) -> Option<DateTime<Utc>> {
    let normalized = match input.strip_suffix('Z').or_else(|| input.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => input.to_string(),
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(ts.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(ts.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}
