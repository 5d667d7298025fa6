use chrono::{DateTime, SecondsFormat, Utc};

/// Request parameter names of the filter vocabulary.
pub const TIMESTAMP_FILTER: &str = "timestamp-filter";
pub const TIMESTAMP_VALUE: &str = "timestamp-value";
pub const TIMESTAMP_VALUE_END: &str = "timestamp-value-end";
pub const SOURCE_FILTER: &str = "source-filter";
pub const SEVERITY_FILTER: &str = "severity-filter";
pub const NAME_FILTER: &str = "name-filter";

/// Separator for set-valued filters.
pub const LIST_SEPARATOR: char = ',';

/// Timestamp restriction. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFilter {
    Before(DateTime<Utc>),
    After(DateTime<Utc>),
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TimestampFilter {
    /// Value of the `timestamp-filter` parameter for this mode.
    pub fn mode(&self) -> &'static str {
        match self {
            TimestampFilter::Before(_) => "before",
            TimestampFilter::After(_) => "after",
            TimestampFilter::Between { .. } => "between",
        }
    }

    /// Whether `instant` satisfies the restriction.
    pub fn matches(&self, instant: DateTime<Utc>) -> bool {
        match *self {
            TimestampFilter::Before(bound) => instant <= bound,
            TimestampFilter::After(bound) => instant >= bound,
            TimestampFilter::Between { start, end } => start <= instant && instant <= end,
        }
    }
}

/// Validated filter criteria. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub timestamp: Option<TimestampFilter>,
    /// OR-matched; empty means no source restriction.
    pub sources: Vec<String>,
    /// Exact match.
    pub severity: Option<String>,
    /// OR-matched; empty means no name restriction.
    pub names: Vec<String>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
            && self.sources.is_empty()
            && self.severity.is_none()
            && self.names.is_empty()
    }

    /// Re-encodes the active filters as request parameters that parse back
    /// into an identical `FilterSet`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(timestamp) = &self.timestamp {
            params.push((TIMESTAMP_FILTER, timestamp.mode().to_string()));
            match *timestamp {
                TimestampFilter::Before(value) | TimestampFilter::After(value) => {
                    params.push((TIMESTAMP_VALUE, encode_instant(value)));
                }
                TimestampFilter::Between { start, end } => {
                    params.push((TIMESTAMP_VALUE, encode_instant(start)));
                    params.push((TIMESTAMP_VALUE_END, encode_instant(end)));
                }
            }
        }

        if !self.sources.is_empty() {
            params.push((SOURCE_FILTER, join_list(&self.sources)));
        }

        if let Some(severity) = &self.severity {
            params.push((SEVERITY_FILTER, severity.clone()));
        }

        if !self.names.is_empty() {
            params.push((NAME_FILTER, join_list(&self.names)));
        }

        params
    }
}

/// Machine-readable instant format used in markup and control state.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Keeps sub-second precision so the value re-parses to the same instant.
fn encode_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn join_list(values: &[String]) -> String {
    values.join(LIST_SEPARATOR.to_string().as_str())
}
