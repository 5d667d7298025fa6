use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::CoreConfig;
use crate::errors::Result;

/// Wrapper around the SQLite connection pool shared by every request.
#[derive(Clone)]
pub struct DatabasePool {
    pool: Pool<Sqlite>,
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool").finish_non_exhaustive()
    }
}

impl DatabasePool {
    /// Establishes a new connection pool based on the core configuration.
    pub async fn connect(config: &CoreConfig) -> Result<Self> {
        Self::connect_with_url(config.database_url()).await
    }

    /// Establishes a connection pool directly from a database URL.
    pub async fn connect_with_url(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database. The connection is never
    /// recycled, otherwise the data would vanish with it.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self { pool })
    }

    pub fn inner(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

/// Trait implemented by components that need to prepare the schema.
#[async_trait]
pub trait DatabaseMigrator {
    async fn run_migrations(&self, pool: &DatabasePool) -> Result<()>;
}

/// Run migrations by delegating to the provided migrators.
pub async fn run_migrations(
    pool: &DatabasePool,
    migrators: &[Box<dyn DatabaseMigrator + Send + Sync>],
) -> Result<()> {
    for migrator in migrators {
        migrator.run_migrations(pool).await?;
    }
    Ok(())
}
