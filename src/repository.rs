use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventlog_core::db::{run_migrations, DatabaseMigrator, DatabasePool};
use eventlog_core::errors::{EventLogError, Result};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection};
use tracing::debug;

use crate::columns::{ColumnId, ColumnSelection};
use crate::filter::FilterSet;
use crate::model::{Event, NewEvent};
use crate::query::{build_count_query, build_select_query, page_offset, BuiltQuery, QueryParam};

/// Applies the embedded migrations creating the `events` table.
pub struct EventsMigrator;

#[async_trait]
impl DatabaseMigrator for EventsMigrator {
    async fn run_migrations(&self, pool: &DatabasePool) -> Result<()> {
        sqlx::migrate!("./migrations").run(pool.inner()).await?;
        Ok(())
    }
}

/// One page of events together with the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total_count: u64,
}

/// Database-backed read access to the event log.
#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: DatabasePool,
}

impl EventRepository {
    /// Builds the repository from an existing pool and ensures migrations ran.
    pub async fn from_pool(pool: DatabasePool) -> Result<Self> {
        let migrators: Vec<Box<dyn DatabaseMigrator + Send + Sync>> = vec![Box::new(EventsMigrator)];
        run_migrations(&pool, &migrators).await?;
        Ok(Self { pool })
    }

    /// Wraps a pool whose schema is managed elsewhere.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Number of events matching the filters.
    pub async fn count(&self, filters: &FilterSet) -> Result<u64> {
        let mut conn = self.pool.inner().acquire().await?;
        count_with(&mut conn, filters).await
    }

    /// Events on the given 1-based page, newest first.
    pub async fn fetch_page(
        &self,
        selection: &ColumnSelection,
        filters: &FilterSet,
        page: u64,
        page_size: u32,
    ) -> Result<Vec<Event>> {
        let mut conn = self.pool.inner().acquire().await?;
        fetch_page_with(&mut conn, selection, filters, page, page_size).await
    }

    /// Runs the count and page queries on a single pooled connection.
    ///
    /// The connection goes back to the pool when this returns, on success
    /// and on error alike.
    pub async fn browse(
        &self,
        selection: &ColumnSelection,
        filters: &FilterSet,
        page: u64,
        page_size: u32,
    ) -> Result<EventPage> {
        let mut conn = self.pool.inner().acquire().await?;
        let total_count = count_with(&mut conn, filters).await?;
        let events = fetch_page_with(&mut conn, selection, filters, page, page_size).await?;
        Ok(EventPage {
            events,
            total_count,
        })
    }

    /// Stores a new event and returns its id.
    pub async fn insert_event(&self, event: &NewEvent) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (name, description, timestamp, source, severity)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.timestamp)
        .bind(&event.source)
        .bind(&event.severity)
        .execute(self.pool.inner())
        .await?;

        Ok(result.last_insert_rowid())
    }
}

async fn count_with(conn: &mut SqliteConnection, filters: &FilterSet) -> Result<u64> {
    let built = build_count_query(filters);
    debug!(sql = %built.sql, params = built.params.len(), "counting events");
    let row = prepare(&built).fetch_one(&mut *conn).await?;
    let total: i64 = row.try_get(0)?;
    u64::try_from(total).map_err(|_| EventLogError::DataAccess(format!("negative count {total}")))
}

async fn fetch_page_with(
    conn: &mut SqliteConnection,
    selection: &ColumnSelection,
    filters: &FilterSet,
    page: u64,
    page_size: u32,
) -> Result<Vec<Event>> {
    let built = build_select_query(selection, filters, page_size, page_offset(page, page_size));
    debug!(sql = %built.sql, params = built.params.len(), page, "fetching events");
    let rows = prepare(&built).fetch_all(&mut *conn).await?;
    rows.iter().map(|row| map_row(row, selection)).collect()
}

fn prepare(built: &BuiltQuery) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    let mut query = sqlx::query(&built.sql);
    for param in &built.params {
        query = match param {
            QueryParam::Text(value) => query.bind(value.clone()),
            QueryParam::Timestamp(value) => query.bind(*value),
            QueryParam::Integer(value) => query.bind(*value),
        };
    }
    query
}

/// Fills only the fields of the selected columns.
fn map_row(row: &SqliteRow, selection: &ColumnSelection) -> Result<Event> {
    let mut event = Event::default();
    for column in selection.iter() {
        let field = column.storage_field;
        match column.id {
            ColumnId::Id => event.id = row.try_get::<i64, _>(field)?,
            ColumnId::Name => event.name = row.try_get::<String, _>(field)?,
            ColumnId::Timestamp => event.timestamp = row.try_get::<DateTime<Utc>, _>(field)?,
            ColumnId::Description => event.description = optional_text(row, field)?,
            ColumnId::Source => event.source = optional_text(row, field)?,
            ColumnId::Severity => event.severity = optional_text(row, field)?,
        }
    }
    Ok(event)
}

fn optional_text(row: &SqliteRow, field: &str) -> Result<String> {
    Ok(row.try_get::<Option<String>, _>(field)?.unwrap_or_default())
}
