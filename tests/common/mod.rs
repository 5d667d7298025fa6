#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use eventlog::{EventRepository, NewEvent};
use eventlog_core::db::DatabasePool;

/// Fixed reference instant; event `n` happens `n` hours after it.
pub fn hour(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(n)
}

pub fn new_event(n: i64, source: &str, severity: &str) -> NewEvent {
    NewEvent {
        name: format!("Event {n}"),
        description: Some(format!("description {n}")),
        timestamp: hour(n),
        source: Some(source.to_string()),
        severity: Some(severity.to_string()),
    }
}

pub async fn repository_with(events: &[NewEvent]) -> EventRepository {
    let pool = DatabasePool::in_memory().await.expect("in-memory pool");
    let repository = EventRepository::from_pool(pool)
        .await
        .expect("migrations apply");
    for event in events {
        repository.insert_event(event).await.expect("event inserted");
    }
    repository
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Parameters carried by the pagination control with the given label.
pub fn control_params(html: &str, label: &str) -> Option<HashMap<String, String>> {
    let end = html.find(&format!(">{label}</button>"))?;
    let start = html[..end].rfind("hx-get=\"")? + "hx-get=\"".len();
    let href = &html[start..];
    let href = &href[..href.find('"')?];
    let href = href.replace("&amp;", "&");
    let (_, query) = href.split_once('?')?;
    Some(url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
}
