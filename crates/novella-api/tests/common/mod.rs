//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use novella_core::clock::Clock;
use novella_core::ids::ChapterId;
use novella_core::repository::ProgressRepository;
use novella_narrative::application::player::EngineConfig;
use novella_progress::in_memory::InMemoryProgressRepository;
use novella_test_support::{FixedClock, InMemoryChapterSource};
use tower::ServiceExt;
use uuid::Uuid;

use novella_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over in-memory content and progress stores.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app(source: InMemoryChapterSource, final_chapter: u32) -> Router {
    build_test_app_with(
        source,
        Arc::new(InMemoryProgressRepository::new()),
        final_chapter,
    )
}

/// Like [`build_test_app`] with a caller-supplied progress repository.
pub fn build_test_app_with(
    source: InMemoryChapterSource,
    progress_repository: Arc<dyn ProgressRepository>,
    final_chapter: u32,
) -> Router {
    let engine = EngineConfig {
        final_chapter: ChapterId::new(final_chapter).unwrap(),
        typewriter_interval: Duration::from_millis(10),
    };
    let app_state = AppState::new(Arc::new(source), progress_repository, fixed_clock(), engine);
    novella_api::app(app_state)
}

fn with_bearer(
    builder: axum::http::request::Builder,
    bearer: Option<Uuid>,
) -> axum::http::request::Builder {
    match bearer {
        Some(id) => builder.header("authorization", format!("Bearer {id}")),
        None => builder,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Extractor rejections come back as plain text.
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
        })
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    bearer: Option<Uuid>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = with_bearer(Request::builder().method("POST").uri(uri), bearer)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(
    app: Router,
    uri: &str,
    bearer: Option<Uuid>,
) -> (StatusCode, serde_json::Value) {
    let request = with_bearer(Request::builder().method("GET").uri(uri), bearer)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
