use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored event.
///
/// Fields outside the requested column selection keep their zero value
/// when an event is read back through [`crate::repository::EventRepository`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub severity: String,
}

/// Event payload accepted by the ingestion path; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}
