// End-to-end checks of interpretation, querying and paging against an in-memory store.
mod common;

use common::{control_params, hour, new_event, params, repository_with};
use eventlog::render::render_fragment;
use eventlog::{
    compute_paging, BrowseRequest, ColumnId, ColumnSelection, FilterSet, NewEvent, TimestampFilter,
};
use eventlog_core::errors::EventLogError;

#[tokio::test]
async fn pages_are_newest_first() {
    let repository = repository_with(&[
        new_event(1, "a", "Low"),
        new_event(2, "a", "Low"),
        new_event(3, "a", "Low"),
    ])
    .await;
    let selection = ColumnSelection::default();
    let filters = FilterSet::default();

    let first = repository.browse(&selection, &filters, 1, 2).await.unwrap();
    let names: Vec<_> = first.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Event 3", "Event 2"]);
    assert_eq!(first.events[0].timestamp, hour(3));
    let paging = compute_paging(first.total_count, 2, 1);
    assert_eq!(paging.total_pages, 2);
    assert!(paging.has_next);
    assert!(!paging.has_previous);

    let second = repository.browse(&selection, &filters, 2, 2).await.unwrap();
    let names: Vec<_> = second.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Event 1"]);
    let paging = compute_paging(second.total_count, 2, 2);
    assert!(!paging.has_next);
    assert!(paging.has_previous);

    let third = repository.browse(&selection, &filters, 3, 2).await.unwrap();
    assert!(third.events.is_empty());
    assert_eq!(third.total_count, 3);
    let paging = compute_paging(third.total_count, 2, 3);
    assert!(!paging.has_next);
    assert!(paging.has_previous);
}

#[tokio::test]
async fn timestamp_filters_are_inclusive() {
    let events: Vec<NewEvent> = (1..=10).map(|n| new_event(n, "a", "Low")).collect();
    let repository = repository_with(&events).await;
    let selection = ColumnSelection::default();

    let cases = [
        (TimestampFilter::Between { start: hour(3), end: hour(6) }, 4),
        (TimestampFilter::Before(hour(4)), 4),
        (TimestampFilter::After(hour(8)), 3),
    ];
    for (filter, expected) in cases {
        let filters = FilterSet {
            timestamp: Some(filter),
            ..FilterSet::default()
        };
        let page = repository.browse(&selection, &filters, 1, 50).await.unwrap();
        assert_eq!(page.total_count, expected, "{filter:?}");
        assert_eq!(page.events.len() as u64, expected, "{filter:?}");
        assert!(page.events.iter().all(|e| filter.matches(e.timestamp)), "{filter:?}");
    }
}

#[tokio::test]
async fn source_and_name_filters_match_any_member() {
    let repository = repository_with(&[
        new_event(1, "a", "Low"),
        new_event(2, "b", "Low"),
        new_event(3, "c", "Low"),
        new_event(4, "a", "High"),
    ])
    .await;
    let selection = ColumnSelection::with_optional([ColumnId::Source]);

    let filters = FilterSet {
        sources: vec!["a".into(), "b".into()],
        ..FilterSet::default()
    };
    let page = repository.browse(&selection, &filters, 1, 50).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert!(page.events.iter().all(|e| e.source == "a" || e.source == "b"));

    let everything = repository
        .browse(&selection, &FilterSet::default(), 1, 50)
        .await
        .unwrap();
    assert_eq!(everything.total_count, 4);

    let filters = FilterSet {
        names: vec!["Event 2".into(), "Event 4".into(), "missing".into()],
        ..FilterSet::default()
    };
    let page = repository.browse(&selection, &filters, 1, 50).await.unwrap();
    let ids: Vec<_> = page.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(ids, ["Event 4", "Event 2"]);
}

#[tokio::test]
async fn missing_severity_yields_empty_fragment() {
    let repository = repository_with(&[new_event(1, "a", "Low"), new_event(2, "b", "Medium")]).await;
    let request = BrowseRequest::from_params(&params(&[("severity-filter", "High")]));

    let page = repository
        .browse(&request.columns, &request.filters, request.page, 10)
        .await
        .unwrap();
    assert!(page.events.is_empty());
    let paging = compute_paging(page.total_count, 10, request.page);
    assert_eq!(paging.total_pages, 0);

    let html = render_fragment(&request.columns, &page.events, &paging, &request.filters);
    assert!(!html.contains("<button"));
    assert!(!html.contains("Showing page"));
}

#[tokio::test]
async fn unrequested_fields_keep_zero_values() {
    let repository = repository_with(&[new_event(1, "a", "High")]).await;

    let page = repository
        .fetch_page(&ColumnSelection::default(), &FilterSet::default(), 1, 10)
        .await
        .unwrap();
    let event = &page[0];
    assert_eq!(event.name, "Event 1");
    assert!(event.id > 0);
    assert_eq!(event.description, "");
    assert_eq!(event.source, "");
    assert_eq!(event.severity, "");

    let selection = ColumnSelection::with_optional([ColumnId::Severity]);
    let page = repository
        .fetch_page(&selection, &FilterSet::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(page[0].severity, "High");
    assert_eq!(page[0].source, "");
}

#[tokio::test]
async fn null_text_columns_read_as_empty() {
    let repository = repository_with(&[NewEvent {
        name: "bare".into(),
        description: None,
        timestamp: hour(1),
        source: None,
        severity: None,
    }])
    .await;
    let selection =
        ColumnSelection::with_optional([ColumnId::Description, ColumnId::Source, ColumnId::Severity]);

    let events = repository
        .fetch_page(&selection, &FilterSet::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].description, "");
    assert_eq!(events[0].source, "");
}

#[tokio::test]
async fn following_next_controls_visits_every_row_once() {
    let sources = ["a", "b", "c"];
    let events: Vec<NewEvent> = (1..=17)
        .map(|n| new_event(n, sources[n as usize % 3], "Low"))
        .collect();
    let repository = repository_with(&events).await;
    let page_size = 3;

    let mut current = params(&[
        ("show-source", "on"),
        ("source-filter", "a,b"),
        ("timestamp-filter", "after"),
        ("timestamp-value", "2024-03-01T02:00"),
    ]);
    let first = BrowseRequest::from_params(&current);

    let all = repository
        .fetch_page(&first.columns, &first.filters, 1, 1000)
        .await
        .unwrap();
    let expected: Vec<i64> = all.iter().map(|e| e.id).collect();
    assert!(expected.len() > page_size as usize * 2);

    let mut visited = Vec::new();
    loop {
        let request = BrowseRequest::from_params(&current);
        assert_eq!(request.columns, first.columns);
        assert_eq!(request.filters, first.filters);

        let page = repository
            .browse(&request.columns, &request.filters, request.page, page_size)
            .await
            .unwrap();
        visited.extend(page.events.iter().map(|e| e.id));

        let paging = compute_paging(page.total_count, page_size, request.page);
        let html = render_fragment(&request.columns, &page.events, &paging, &request.filters);
        match control_params(&html, "Next") {
            Some(next) => {
                assert_eq!(next["page"], (request.page + 1).to_string());
                current = next;
            }
            None => break,
        }
    }

    assert_eq!(visited, expected);
}

#[tokio::test]
async fn closed_store_surfaces_data_access_error() {
    let repository = repository_with(&[new_event(1, "a", "Low")]).await;
    repository.pool().inner().close().await;

    let err = repository
        .browse(&ColumnSelection::default(), &FilterSet::default(), 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, EventLogError::DataAccess(_)));
}

#[tokio::test]
async fn five_digit_year_bounds_are_ignored() {
    let repository = repository_with(&[new_event(1, "a", "Low"), new_event(2, "a", "Low")]).await;

    for mode in ["after", "before"] {
        let request = BrowseRequest::from_params(&params(&[
            ("timestamp-filter", mode),
            ("timestamp-value", "+10000-01-01T00:00"),
        ]));
        assert_eq!(request.filters.timestamp, None, "{mode}");

        let page = repository
            .browse(&request.columns, &request.filters, request.page, 10)
            .await
            .unwrap();
        assert_eq!(page.total_count, 2, "{mode}");
        assert_eq!(page.events.len(), 2, "{mode}");
    }
}

#[tokio::test]
async fn page_numbers_beyond_u32_are_kept() {
    let repository = repository_with(&[new_event(1, "a", "Low")]).await;
    let request = BrowseRequest::from_params(&params(&[("page", "99999999999")]));
    assert_eq!(request.page, 99_999_999_999);

    let page = repository
        .browse(&request.columns, &request.filters, request.page, 50)
        .await
        .unwrap();
    assert!(page.events.is_empty());
    assert_eq!(page.total_count, 1);

    let paging = compute_paging(page.total_count, 50, request.page);
    assert_eq!(paging.page, 99_999_999_999);
    assert!(paging.has_previous);
    assert!(!paging.has_next);

    let html = render_fragment(&request.columns, &page.events, &paging, &request.filters);
    assert!(html.contains("Showing page 99999999999 of 1"));
    let previous = control_params(&html, "Previous").expect("previous control");
    assert_eq!(previous.get("page").map(String::as_str), Some("99999999998"));
}

#[tokio::test]
async fn hostile_filter_values_match_nothing_and_leave_the_table() {
    let repository = repository_with(&[new_event(1, "a", "Low"), new_event(2, "b", "High")]).await;
    let hostile = "x') OR 1=1; DROP TABLE events; --";

    for key in ["source-filter", "name-filter", "severity-filter"] {
        let request = BrowseRequest::from_params(&params(&[(key, hostile)]));
        let page = repository
            .browse(&request.columns, &request.filters, request.page, 10)
            .await
            .unwrap();
        assert_eq!(page.total_count, 0, "{key}");
        assert!(page.events.is_empty(), "{key}");
    }

    let quoted = "a' OR '1'='1";
    let request = BrowseRequest::from_params(&params(&[("source-filter", quoted)]));
    assert_eq!(repository.count(&request.filters).await.unwrap(), 0);

    assert_eq!(repository.count(&FilterSet::default()).await.unwrap(), 2);
}
