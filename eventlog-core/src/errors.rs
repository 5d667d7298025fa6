use std::io;

use thiserror::Error;

/// Result type used across the event log crates.
pub type Result<T> = std::result::Result<T, EventLogError>;

/// Canonical error representation shared by the server and the CLI.
///
/// Malformed request input never produces one of these: the request
/// interpreter degrades it to "absent" instead. Only the storage boundary
/// and process setup fail.
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("data access error: {0}")]
    DataAccess(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    General(String),
}

impl From<sqlx::Error> for EventLogError {
    fn from(err: sqlx::Error) -> Self {
        EventLogError::DataAccess(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for EventLogError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        EventLogError::Migration(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

impl From<ConfigError> for EventLogError {
    fn from(value: ConfigError) -> Self {
        EventLogError::Config(value.to_string())
    }
}
