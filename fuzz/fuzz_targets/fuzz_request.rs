// Fuzz target driving arbitrary request parameters through interpretation and query building.
#![no_main]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use eventlog::query::{build_count_query, build_select_query, page_offset, BuiltQuery};
use eventlog::{BrowseRequest, ColumnSelection, FilterSet, TimestampFilter};
use libfuzzer_sys::fuzz_target;

const PAGE_SIZE: u32 = 50;

const KEYS: [&str; 10] = [
    "page",
    "show-description",
    "show-source",
    "show-severity",
    "timestamp-filter",
    "timestamp-value",
    "timestamp-value-end",
    "source-filter",
    "severity-filter",
    "name-filter",
];

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Each line feeds the next known key.
    let params: HashMap<String, String> = KEYS
        .iter()
        .zip(text.split('\n'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    let request = BrowseRequest::from_params(&params);
    assert!(request.page >= 1);
    assert!(!request.columns.is_empty());

    // Query text may depend on which filters are present and how many
    // values they hold, never on the values themselves.
    let blank = blank_values(&request.filters);
    let (count, select) = queries(&request.columns, &request.filters, request.page);
    let (blank_count, blank_select) = queries(&request.columns, &blank, 1);

    assert_eq!(count.sql, blank_count.sql);
    assert_eq!(select.sql, blank_select.sql);
    for query in [&count, &select] {
        assert_eq!(query.sql.matches('?').count(), query.params.len());
    }
});

fn queries(columns: &ColumnSelection, filters: &FilterSet, page: u64) -> (BuiltQuery, BuiltQuery) {
    (
        build_count_query(filters),
        build_select_query(columns, filters, PAGE_SIZE, page_offset(page, PAGE_SIZE)),
    )
}

fn blank_values(filters: &FilterSet) -> FilterSet {
    let epoch = DateTime::<Utc>::default();
    FilterSet {
        timestamp: filters.timestamp.map(|timestamp| match timestamp {
            TimestampFilter::Before(_) => TimestampFilter::Before(epoch),
            TimestampFilter::After(_) => TimestampFilter::After(epoch),
            TimestampFilter::Between { .. } => TimestampFilter::Between {
                start: epoch,
                end: epoch,
            },
        }),
        sources: vec![String::new(); filters.sources.len()],
        severity: filters.severity.as_ref().map(|_| String::new()),
        names: vec![String::new(); filters.names.len()],
    }
}
