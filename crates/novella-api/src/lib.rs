//! Novella HTTP API: chapter content, player progress and engine sessions.

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/chapters", routes::content::router())
        .nest("/api/v1/progress", routes::progress::router())
        .nest("/api/v1/sessions", routes::sessions::router())
        .with_state(state)
}
