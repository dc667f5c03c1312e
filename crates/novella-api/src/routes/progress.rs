//! Routes for the Player Progress context.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use novella_core::ids::ChapterId;
use novella_core::repository::ProgressRecord;
use novella_progress::application::command_handlers::{self, CompletionReceipt};
use novella_progress::application::query_handlers;
use novella_progress::domain::commands::RecordCompletion;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::identity::Identity;
use crate::state::AppState;

/// Request body for POST /complete.
#[derive(Debug, Deserialize)]
pub struct CompleteChapterRequest {
    /// The chapter just completed.
    pub chapter: ChapterId,
}

/// GET /
#[instrument(skip(state))]
async fn get_progress(
    State(state): State<AppState>,
    Identity(player_id): Identity,
) -> Json<ProgressRecord> {
    Json(query_handlers::get_progress(player_id, &*state.progress_repository).await)
}

/// POST /complete
#[instrument(skip(state, request), fields(chapter_id = %request.chapter))]
async fn complete_chapter(
    State(state): State<AppState>,
    Identity(player_id): Identity,
    Json(request): Json<CompleteChapterRequest>,
) -> Result<Json<CompletionReceipt>, ApiError> {
    let command = RecordCompletion {
        player_id,
        chapter_id: request.chapter,
    };

    info!("handling record_completion command");

    let receipt = command_handlers::handle_record_completion(
        &command,
        state.clock.as_ref(),
        &*state.progress_repository,
    )
    .await?;

    Ok(Json(receipt))
}

/// Returns the router for the progress context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_progress))
        .route("/complete", post(complete_chapter))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use novella_core::repository::ProgressRepository;
    use novella_narrative::application::player::EngineConfig;
    use novella_progress::in_memory::InMemoryProgressRepository;
    use novella_test_support::{FailingProgressRepository, FixedClock, InMemoryChapterSource};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    fn app_with(repository: Arc<dyn ProgressRepository>) -> Router {
        let state = AppState::new(
            Arc::new(InMemoryChapterSource::new()),
            repository,
            Arc::new(FixedClock(Utc::now())),
            EngineConfig::default(),
        );
        router().with_state(state)
    }

    async fn complete(app: Router, bearer: Option<Uuid>, chapter: u32) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/complete")
            .header("content-type", "application/json");
        if let Some(id) = bearer {
            builder = builder.header("authorization", format!("Bearer {id}"));
        }
        let body = serde_json::json!({ "chapter": chapter });
        let request = builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_complete_returns_receipt() {
        // Arrange
        let app = app_with(Arc::new(InMemoryProgressRepository::new()));

        // Act
        let (status, json) = complete(app, Some(Uuid::new_v4()), 2).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["progress"]["chapters_completed"], 2);
        assert_eq!(json["progress"]["chapters_unlocked"], 3);
    }

    #[tokio::test]
    async fn test_complete_without_identity_returns_401() {
        let app = app_with(Arc::new(InMemoryProgressRepository::new()));

        let (status, json) = complete(app, None, 1).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "unauthenticated");
    }

    #[tokio::test]
    async fn test_complete_with_failing_store_returns_500() {
        let app = app_with(Arc::new(FailingProgressRepository));

        let (status, json) = complete(app, Some(Uuid::new_v4()), 1).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_get_progress_with_failing_store_returns_default() {
        // Arrange
        let app = app_with(Arc::new(FailingProgressRepository));
        let request = Request::builder()
            .uri("/")
            .header("authorization", format!("Bearer {}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["chapters_unlocked"], 1);
        assert_eq!(json["chapters_completed"], 0);
    }
}
