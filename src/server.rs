use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use eventlog_core::errors::EventLogError;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::paging::compute_paging;
use crate::render::{render_fragment, render_index, EVENTS_PATH};
use crate::repository::EventRepository;
use crate::request::BrowseRequest;

/// Everything a request handler needs, built once at startup.
#[derive(Clone, Debug)]
pub struct BrowserContext {
    pub repository: EventRepository,
    pub page_size: u32,
}

impl BrowserContext {
    pub fn new(repository: EventRepository, page_size: u32) -> Self {
        Self {
            repository,
            page_size: page_size.max(1),
        }
    }
}

pub fn build_router(context: BrowserContext) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route(EVENTS_PATH, get(list_events))
        .route("/filter", get(list_events))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn health_check() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    Html(render_index())
}

type AppResult<T> = Result<T, AppError>;

async fn list_events(
    State(context): State<BrowserContext>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let request = BrowseRequest::from_params(&params);
    debug!(
        page = request.page,
        columns = request.columns.len(),
        filters = ?request.filters,
        "browsing events"
    );

    let result = context
        .repository
        .browse(
            &request.columns,
            &request.filters,
            request.page,
            context.page_size,
        )
        .await?;

    let paging = compute_paging(result.total_count, context.page_size, request.page);
    Ok(Html(render_fragment(
        &request.columns,
        &result.events,
        &paging,
        &request.filters,
    )))
}

#[derive(Debug, Clone)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn internal<M: Into<String>>(message: M) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<EventLogError> for AppError {
    fn from(err: EventLogError) -> Self {
        error!(%err, "event request failed");
        match err {
            EventLogError::DataAccess(_) => AppError::internal("failed to load events"),
            _ => AppError::internal("internal server error"),
        }
    }
}
