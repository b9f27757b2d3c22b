//! Parse-or-missing conversions for raw cell text.
//!
//! Dirty input never raises: anything that does not parse cleanly becomes
//! `None` and is later visible only through the data-quality counters.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Coerce a raw percentage cell to a number.
///
/// Empty, non-numeric and non-finite values (`"nan"`, `"inf"`) are missing.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a vote date given as `dd.mm.yyyy` or ISO, optionally with a time part.
pub fn parse_vote_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a stored classification label (`True`/`False`, `1`/`0`).
pub fn parse_label(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
