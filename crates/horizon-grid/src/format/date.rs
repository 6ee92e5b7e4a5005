//! Date parsing and named date formats.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use horizon_grid_core::logging::targets;
use serde_json::Value;

use crate::model::display_value;

/// Format used by date columns that do not set `dateFormat`.
pub const DEFAULT_DATE_FORMAT: &str = "fullDate";

/// Expands a named format into a strftime pattern.
///
/// Unknown names are treated as strftime patterns themselves.
pub fn pattern_for(format_name: &str) -> &str {
    match format_name {
        "short" => "%-m/%-d/%y, %-I:%M %p",
        "medium" => "%b %-d, %Y, %-I:%M:%S %p",
        "long" => "%B %-d, %Y at %-I:%M:%S %p",
        "full" => "%A, %B %-d, %Y at %-I:%M:%S %p",
        "shortDate" => "%-m/%-d/%y",
        "mediumDate" => "%b %-d, %Y",
        "longDate" => "%B %-d, %Y",
        "fullDate" => "%A, %B %-d, %Y",
        "shortTime" => "%-I:%M %p",
        "mediumTime" => "%-I:%M:%S %p",
        pattern => pattern,
    }
}

/// Reads a date from a row value.
///
/// Accepts epoch milliseconds, RFC 3339 timestamps, ISO date-times without
/// an offset and plain `YYYY-MM-DD` dates. Times with an offset keep their
/// local wall-clock time; epoch milliseconds are read as UTC.
pub fn parse_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        Value::String(s) => parse_str(s.trim()),
        _ => None,
    }
}

fn parse_str(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Formats `value` with a named format or strftime pattern.
///
/// Returns `None` if the pattern is invalid for a date without a time zone.
pub fn format_date(value: &NaiveDateTime, format_name: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern_for(format_name)).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", value.format_with_items(items.iter())).ok()?;
    Some(out)
}

/// Renders a row value as a date. Values that cannot be read as a date, or
/// formats that cannot be applied, fall back to the raw value.
pub fn format_value(value: &Value, format_name: &str) -> String {
    let Some(date) = parse_value(value) else {
        tracing::trace!(target: targets::FORMAT, value = %value, "value is not a date");
        return display_value(Some(value));
    };
    format_date(&date, format_name).unwrap_or_else(|| {
        tracing::warn!(target: targets::FORMAT, format = format_name, "invalid date format");
        display_value(Some(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_formats() {
        let value = json!("2015-06-15");
        assert_eq!(format_value(&value, "fullDate"), "Monday, June 15, 2015");
        assert_eq!(format_value(&value, "shortDate"), "6/15/15");
        assert_eq!(format_value(&value, "mediumDate"), "Jun 15, 2015");
        assert_eq!(format_value(&value, "longDate"), "June 15, 2015");
    }

    #[test]
    fn test_custom_pattern() {
        assert_eq!(format_value(&json!("1980-01-02"), "%Y/%m/%d"), "1980/01/02");
    }

    #[test]
    fn test_parse_variants() {
        let expected = NaiveDate::from_ymd_opt(2015, 6, 15)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();
        assert_eq!(parse_value(&json!("2015-06-15T10:30:00")), Some(expected));
        assert_eq!(parse_value(&json!("2015-06-15T10:30:00+02:00")), Some(expected));
        assert_eq!(parse_value(&json!("2015-06-15 10:30:00")), Some(expected));
        assert_eq!(
            parse_value(&json!(1_434_364_200_000_i64)),
            Some(expected)
        );
    }

    #[test]
    fn test_unparsable_falls_back_to_raw() {
        assert_eq!(format_value(&json!("not a date"), "fullDate"), "not a date");
        assert_eq!(format_value(&json!(true), "fullDate"), "true");
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_raw() {
        assert_eq!(format_value(&json!("2015-06-15"), "%Q"), "2015-06-15");
        // A time zone cannot be printed for a date without one.
        assert_eq!(format_value(&json!("2015-06-15"), "%Z"), "2015-06-15");
    }
}
