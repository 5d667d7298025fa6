//! Turns raw request parameters into a validated browse request.
//!
//! Nothing here fails: malformed input degrades to "absent" (filters,
//! optional columns) or to the default (page number).

use std::collections::HashMap;
use std::num::IntErrorKind;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::columns::{all_columns, ColumnSelection, COLUMN_FLAG_ON};
use crate::filter::{
    FilterSet, TimestampFilter, LIST_SEPARATOR, NAME_FILTER, SEVERITY_FILTER, SOURCE_FILTER,
    TIMESTAMP_FILTER, TIMESTAMP_VALUE, TIMESTAMP_VALUE_END,
};

/// Request parameter carrying the 1-based page number.
pub const PAGE_PARAM: &str = "page";

const MAX_YEAR: i32 = 9999;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Everything one request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    /// 1-based, never below 1. Not bounded above.
    pub page: u64,
    pub columns: ColumnSelection,
    pub filters: FilterSet,
}

impl Default for BrowseRequest {
    fn default() -> Self {
        Self {
            page: 1,
            columns: ColumnSelection::default(),
            filters: FilterSet::default(),
        }
    }
}

impl BrowseRequest {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            page: parse_page(params.get(PAGE_PARAM).map(String::as_str)),
            columns: parse_columns(params),
            filters: parse_filters(params),
        }
    }
}

/// Page number, defaulting to 1 when missing, malformed or below 1.
/// Numbers too large for `u64` saturate rather than reset to the first page.
pub fn parse_page(raw: Option<&str>) -> u64 {
    let parsed = match raw.map(str::trim).map(str::parse::<u64>) {
        Some(Ok(page)) => page,
        Some(Err(err)) if *err.kind() == IntErrorKind::PosOverflow => u64::MAX,
        _ => return 1,
    };
    parsed.max(1)
}

/// Default columns plus every column whose `show-*` flag is `on`.
pub fn parse_columns(params: &HashMap<String, String>) -> ColumnSelection {
    let requested = all_columns()
        .iter()
        .filter(|column| {
            params
                .get(&column.flag_name())
                .is_some_and(|value| value == COLUMN_FLAG_ON)
        })
        .map(|column| column.id);
    ColumnSelection::with_optional(requested)
}

pub fn parse_filters(params: &HashMap<String, String>) -> FilterSet {
    let get = |key: &str| params.get(key).map(String::as_str);

    FilterSet {
        timestamp: parse_timestamp_filter(
            get(TIMESTAMP_FILTER),
            get(TIMESTAMP_VALUE),
            get(TIMESTAMP_VALUE_END),
        ),
        sources: parse_list(get(SOURCE_FILTER)),
        severity: get(SEVERITY_FILTER)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned),
        names: parse_list(get(NAME_FILTER)),
    }
}

/// Builds the timestamp filter; any missing or unparseable piece drops the
/// whole filter.
pub fn parse_timestamp_filter(
    mode: Option<&str>,
    value: Option<&str>,
    value_end: Option<&str>,
) -> Option<TimestampFilter> {
    let mode = mode?.trim().to_ascii_lowercase();
    let start = parse_instant(value?)?;
    match mode.as_str() {
        "before" => Some(TimestampFilter::Before(start)),
        "after" => Some(TimestampFilter::After(start)),
        "between" => {
            let end = parse_instant(value_end?)?;
            Some(TimestampFilter::Between { start, end })
        }
        _ => None,
    }
}

/// Parses RFC 3339, HTML `datetime-local` style values (taken as UTC) or a
/// bare date (midnight UTC).
///
/// Years outside 0..=9999 are rejected: the store compares instants as text,
/// which only orders correctly for four-digit years.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    parse_any_instant(raw).filter(|instant| (0..=MAX_YEAR).contains(&instant.year()))
}

fn parse_any_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Splits a comma-separated list, trimming entries and dropping empty and
/// repeated ones.
pub fn parse_list(raw: Option<&str>) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for item in raw.unwrap_or_default().split(LIST_SEPARATOR) {
        let item = item.trim();
        if !item.is_empty() && !values.iter().any(|existing| existing == item) {
            values.push(item.to_owned());
        }
    }
    values
}
