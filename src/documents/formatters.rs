//! Date display helpers
//!
//! All dates are printed in Europe/Paris civil time. None of these functions
//! fail: unparseable input is printed back unchanged.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{Europe::Paris, Tz};

/// Naive date-time layouts accepted besides RFC 3339 (read as UTC)
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// `"2025-10-31T08:30:00Z"` → `"31/10/2025"`
pub fn format_date_paris(iso: &str) -> String {
    match parse_paris(iso) {
        Some(dt) => dt.format("%d/%m/%Y").to_string(),
        None => iso.to_string(),
    }
}

/// `"2025-10-31"` → `"vendredi 31 octobre 2025"`
pub fn format_date_readable(date: &str) -> String {
    match parse_paris(date) {
        Some(dt) => dt.format_localized("%A %-d %B %Y", Locale::fr_FR).to_string(),
        None => date.to_string(),
    }
}

/// `"2025-10-31T08:30:00Z"` → `"31/10/2025 09:30"`
pub fn format_date_time_paris(iso: &str) -> String {
    match parse_paris(iso) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => iso.to_string(),
    }
}

/// `"2025-10-31"` → `"31/10/2025"`
///
/// Field swap only; the date is not checked against the calendar.
pub fn format_ymd(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day]
            if is_digits(year, 4) && is_digits(month, 2) && is_digits(day, 2) =>
        {
            format!("{}/{}/{}", day, month, year)
        }
        _ => date.to_string(),
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an instant (or a bare date) and move it to Paris time
fn parse_paris(input: &str) -> Option<DateTime<Tz>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Paris));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(Utc.from_utc_datetime(&naive).with_timezone(&Paris));
        }
    }

    // A bare date is already a Paris calendar day
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Paris.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}
