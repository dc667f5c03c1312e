//! Routes for single-player engine sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use novella_content::application::chapter_store::ChapterStore;
use novella_core::command::Command;
use novella_core::error::DomainError;
use novella_core::ids::{ChapterId, PlayerId};
use novella_narrative::application::player::{ProgressSync, StoryPlayer};
use novella_narrative::application::query_handlers::{EngineView, engine_view};
use novella_narrative::domain::commands::PlayerCommand;
use novella_narrative::domain::events::EngineSignal;
use novella_progress::application::query_handlers::get_progress;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::identity::Identity;
use crate::state::{AppState, SessionHandle};

/// Request body for POST /.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Chapter to open. Defaults to the player's unlock watermark.
    #[serde(default)]
    pub chapter: Option<ChapterId>,
}

/// Response body for a newly created session.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub view: EngineView,
}

/// Response body after dispatching a command.
#[derive(Debug, Serialize)]
pub struct CommandOutcome {
    /// What the command did; `None` when it was ignored.
    pub signal: Option<EngineSignal>,
    pub view: EngineView,
}

/// Refuses chapters above the player's unlock watermark.
async fn ensure_unlocked(
    state: &AppState,
    player_id: Option<PlayerId>,
    chapter_id: ChapterId,
) -> Result<(), ApiError> {
    let unlocked = get_progress(player_id, &*state.progress_repository)
        .await
        .chapters_unlocked;
    if chapter_id.get() > unlocked {
        return Err(DomainError::ChapterLocked {
            chapter_id,
            unlocked,
        }
        .into());
    }
    Ok(())
}

fn session(state: &AppState, id: Uuid) -> Result<SessionHandle, ApiError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| DomainError::SessionNotFound(id).into())
}

/// POST /
#[instrument(skip(state, request))]
async fn create_session(
    State(state): State<AppState>,
    Identity(player_id): Identity,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let chapter_id = match request.chapter {
        Some(chapter_id) => {
            ensure_unlocked(&state, player_id, chapter_id).await?;
            chapter_id
        }
        None => {
            let unlocked = get_progress(player_id, &*state.progress_repository)
                .await
                .chapters_unlocked;
            ChapterId::new(unlocked)
                .unwrap_or(ChapterId::FIRST)
                .min(state.engine.final_chapter)
        }
    };

    let mut player = StoryPlayer::start(
        state.engine,
        Arc::new(ChapterStore::new(Arc::clone(&state.chapter_source))),
        ProgressSync {
            player_id,
            repository: Arc::clone(&state.progress_repository),
            clock: Arc::clone(&state.clock),
        },
        chapter_id,
    );
    player.settle().await;
    let view = engine_view(&player);
    let session_id = state.sessions.insert(player);

    info!(session_id = %session_id, chapter_id = %chapter_id, "session started");

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated { session_id, view }),
    ))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EngineView>, ApiError> {
    let handle = session(&state, id)?;
    let mut player = handle.lock().await;
    player.pump();
    Ok(Json(engine_view(&player)))
}

/// POST /{id}/commands
#[instrument(skip(state, command), fields(command = %command.command_type()))]
async fn dispatch_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<PlayerCommand>,
) -> Result<Json<CommandOutcome>, ApiError> {
    let handle = session(&state, id)?;
    let mut player = handle.lock().await;
    // Unlocks belong to the session owner, whoever sends the command.
    if let PlayerCommand::JumpToChapter { chapter_id } = command {
        ensure_unlocked(&state, player.player_id(), chapter_id).await?;
    }

    player.pump();
    let signal = player.dispatch(command);
    if matches!(signal, Some(EngineSignal::ChapterRequested { .. })) {
        player.settle().await;
    }

    Ok(Json(CommandOutcome {
        signal,
        view: engine_view(&player),
    }))
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .remove(id)
        .ok_or(DomainError::SessionNotFound(id))?;
    info!(session_id = %id, "session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for engine sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(delete_session))
        .route("/{id}/commands", post(dispatch_command))
}
