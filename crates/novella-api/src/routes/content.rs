//! Routes for chapter content.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use novella_content::domain::chapter::Chapter;
use novella_core::ids::ChapterId;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{id}
#[instrument(skip(state))]
async fn get_chapter(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Chapter>, ApiError> {
    let chapter_id = ChapterId::try_from(id)?;
    let chapter = state.chapters.load(chapter_id).await?;
    Ok(Json(Chapter::clone(&chapter)))
}

/// Returns the router for chapter content.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_chapter))
}
