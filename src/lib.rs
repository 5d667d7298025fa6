//! Server-rendered event log browser.
//!
//! A request flows through the modules in order: [`request`] interprets the
//! parameters, [`query`] builds the parameterized statements,
//! [`repository`] runs them, [`paging`] computes page bounds and [`render`]
//! produces the table fragment. [`server`] wires the pipeline into axum.

pub mod columns;
pub mod filter;
pub mod model;
pub mod paging;
pub mod query;
pub mod render;
pub mod repository;
pub mod request;
pub mod server;

pub use columns::{Column, ColumnId, ColumnSelection};
pub use filter::{FilterSet, TimestampFilter};
pub use model::{Event, NewEvent};
pub use paging::{compute_paging, Paging};
pub use repository::{EventPage, EventRepository};
pub use request::BrowseRequest;
pub use server::{build_router, BrowserContext};
