//! Core shared library for the event log browser.
//!
//! This crate exposes the primitives the server and the operator CLI
//! both depend on: the error taxonomy, configuration loading, the
//! database pool and migration seam, and logging setup.

pub mod config;
pub mod db;
pub mod errors;
pub mod logging;

pub use config::CoreConfig;
pub use db::DatabasePool;
pub use errors::{EventLogError, Result as CoreResult};
