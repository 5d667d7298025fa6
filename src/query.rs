//! Parameterized count and page queries over the `events` table.
//!
//! Query text is assembled only from registry storage fields and fixed
//! clause fragments. Every value that came from a request is carried as a
//! bound parameter in [`BuiltQuery::params`].

use chrono::{DateTime, Utc};

use crate::columns::{column, ColumnId, ColumnSelection};
use crate::filter::{FilterSet, TimestampFilter};

const EVENTS_TABLE: &str = "events";

/// A value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i64),
}

/// Query text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

/// Minimal builder that keeps text and bindings in lockstep.
///
/// `sqlx::QueryBuilder` offers the same `push`/`push_bind` API but hides the
/// bound arguments, so it cannot produce an inspectable [`BuiltQuery`].
#[derive(Debug, Default)]
struct QueryBuilder {
    sql: String,
    params: Vec<QueryParam>,
}

impl QueryBuilder {
    fn new(init: &str) -> Self {
        Self {
            sql: init.to_owned(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    fn push_bind(&mut self, param: QueryParam) -> &mut Self {
        self.sql.push('?');
        self.params.push(param);
        self
    }

    /// `field IN (?, ?, ...)`, one placeholder per value.
    fn push_in(&mut self, field: &'static str, values: &[String]) -> &mut Self {
        self.push(" AND ").push(field).push(" IN (");
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.push_bind(QueryParam::Text(value.clone()));
        }
        self.push(")")
    }

    fn build(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Counts every row matching the filters, whatever columns are visible.
pub fn build_count_query(filters: &FilterSet) -> BuiltQuery {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(EVENTS_TABLE);
    push_predicates(&mut builder, filters);
    builder.build()
}

/// Selects one page of the selected columns, newest first.
pub fn build_select_query(
    selection: &ColumnSelection,
    filters: &FilterSet,
    page_size: u32,
    offset: u64,
) -> BuiltQuery {
    let projection = selection
        .iter()
        .map(|column| column.storage_field)
        .collect::<Vec<_>>()
        .join(", ");

    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(&projection).push(" FROM ").push(EVENTS_TABLE);
    push_predicates(&mut builder, filters);

    builder
        .push(" ORDER BY ")
        .push(column(ColumnId::Timestamp).storage_field)
        .push(" DESC");

    builder
        .push(" LIMIT ")
        .push_bind(QueryParam::Integer(i64::from(page_size)));
    builder
        .push(" OFFSET ")
        .push_bind(QueryParam::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

    builder.build()
}

/// Row offset of a 1-based page.
pub fn page_offset(page: u64, page_size: u32) -> u64 {
    (page.max(1) - 1).saturating_mul(u64::from(page_size))
}

fn push_predicates(builder: &mut QueryBuilder, filters: &FilterSet) {
    builder.push(" WHERE 1=1");

    let timestamp = column(ColumnId::Timestamp).storage_field;
    match filters.timestamp {
        Some(TimestampFilter::Before(value)) => {
            builder
                .push(" AND ")
                .push(timestamp)
                .push(" <= ")
                .push_bind(QueryParam::Timestamp(value));
        }
        Some(TimestampFilter::After(value)) => {
            builder
                .push(" AND ")
                .push(timestamp)
                .push(" >= ")
                .push_bind(QueryParam::Timestamp(value));
        }
        Some(TimestampFilter::Between { start, end }) => {
            builder
                .push(" AND ")
                .push(timestamp)
                .push(" BETWEEN ")
                .push_bind(QueryParam::Timestamp(start))
                .push(" AND ")
                .push_bind(QueryParam::Timestamp(end));
        }
        None => {}
    }

    if !filters.sources.is_empty() {
        builder.push_in(column(ColumnId::Source).storage_field, &filters.sources);
    }

    if let Some(severity) = &filters.severity {
        builder
            .push(" AND ")
            .push(column(ColumnId::Severity).storage_field)
            .push(" = ")
            .push_bind(QueryParam::Text(severity.clone()));
    }

    if !filters.names.is_empty() {
        builder.push_in(column(ColumnId::Name).storage_field, &filters.names);
    }
}
