//! Mock upstream server lifecycle management
//!
//! One axum server plays both upstreams:
//! - `GET /users/{username}/collection/folders/0/releases` (Discogs)
//! - `GET /index.json` (russ.fm catalog index)
//!
//! Each test gets its own server on a random port.

use super::constants::*;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// What the collection endpoint answers for pages past the configured ones.
#[derive(Debug, Clone, Copy)]
pub enum PastEnd {
    EmptyPage,
    NotFound,
}

struct MockState {
    pages: Vec<Vec<Value>>,
    past_end: PastEnd,
    report_page_count: bool,
    /// Remaining 429 responses to send per page.
    rate_limits: Mutex<HashMap<u32, u32>>,
    /// Pages answered with the given status.
    failures: HashMap<u32, StatusCode>,
    catalog: Option<Value>,
    requested_pages: Mutex<Vec<u32>>,
}

pub struct MockServerBuilder {
    pages: Vec<Vec<Value>>,
    past_end: PastEnd,
    report_page_count: bool,
    rate_limits: HashMap<u32, u32>,
    failures: HashMap<u32, StatusCode>,
    catalog: Option<Value>,
}

impl MockServerBuilder {
    /// Append a page of releases. Pages are numbered from 1 in call order.
    pub fn page(mut self, releases: Vec<Value>) -> Self {
        self.pages.push(releases);
        self
    }

    pub fn past_end(mut self, past_end: PastEnd) -> Self {
        self.past_end = past_end;
        self
    }

    /// Include `pagination.pages` in responses.
    pub fn report_page_count(mut self) -> Self {
        self.report_page_count = true;
        self
    }

    /// Answer the first `times` requests for `page` with 429.
    pub fn rate_limit(mut self, page: u32, times: u32) -> Self {
        self.rate_limits.insert(page, times);
        self
    }

    pub fn fail_page(mut self, page: u32, status: StatusCode) -> Self {
        self.failures.insert(page, status);
        self
    }

    /// Catalog index documents. Without this call the index answers 500.
    pub fn catalog(mut self, documents: Vec<Value>) -> Self {
        self.catalog = Some(json!({ "documents": documents }));
        self
    }

    /// Binds to a random port and serves in a background task.
    pub async fn spawn(self) -> MockServer {
        let state = Arc::new(MockState {
            pages: self.pages,
            past_end: self.past_end,
            report_page_count: self.report_page_count,
            rate_limits: Mutex::new(self.rate_limits),
            failures: self.failures,
            catalog: self.catalog,
            requested_pages: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                "/users/{username}/collection/folders/0/releases",
                get(collection_releases),
            )
            .route("/index.json", get(catalog_index))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        MockServer {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }
}

/// Mock upstream server. Shuts down when dropped.
pub struct MockServer {
    /// Base URL, e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    state: Arc<MockState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder {
            pages: Vec::new(),
            past_end: PastEnd::EmptyPage,
            report_page_count: false,
            rate_limits: HashMap::new(),
            failures: HashMap::new(),
            catalog: None,
        }
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/index.json", self.base_url)
    }

    /// Collection pages requested so far, in order, including retries.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.state.requested_pages.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
    per_page: Option<u32>,
}

async fn collection_releases(
    State(state): State<Arc<MockState>>,
    Path(username): Path<String>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let expected_auth = format!("Discogs token={}", TEST_TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected_auth);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "You must authenticate to access this resource."})),
        )
            .into_response();
    }
    if username != TEST_USERNAME {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "User does not exist or may have been deleted."})),
        )
            .into_response();
    }

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(50);
    state.requested_pages.lock().unwrap().push(page);

    {
        let mut rate_limits = state.rate_limits.lock().unwrap();
        if let Some(remaining) = rate_limits.get_mut(&page) {
            if *remaining > 0 {
                *remaining -= 1;
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, "0")],
                    Json(json!({"message": "You are making requests too quickly."})),
                )
                    .into_response();
            }
        }
    }

    if let Some(status) = state.failures.get(&page) {
        return (*status, Json(json!({"message": "Something went wrong."}))).into_response();
    }

    let releases = match (page as usize).checked_sub(1).and_then(|i| state.pages.get(i)) {
        Some(releases) => releases.clone(),
        None => match state.past_end {
            PastEnd::EmptyPage => Vec::new(),
            PastEnd::NotFound => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({"message": "Page not found."})),
                )
                    .into_response()
            }
        },
    };

    let items: usize = state.pages.iter().map(Vec::len).sum();
    let mut pagination = json!({
        "page": page,
        "per_page": per_page,
        "items": items,
    });
    if state.report_page_count {
        pagination["pages"] = json!(state.pages.len());
    }

    Json(json!({
        "pagination": pagination,
        "releases": releases,
    }))
    .into_response()
}

async fn catalog_index(State(state): State<Arc<MockState>>) -> Response {
    match &state.catalog {
        Some(catalog) => Json(catalog.clone()).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
