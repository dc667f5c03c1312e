//! Query handlers for the Player Progress context.

use novella_core::ids::PlayerId;
use novella_core::repository::{ProgressRecord, ProgressRepository};
use tracing::warn;

/// Retrieves a player's progress, falling back to the default record
/// (`chapters_unlocked = 1`, `chapters_completed = 0`) when the identity is
/// unresolved, no record exists, or the repository fails. Never errors.
pub async fn get_progress(
    player_id: Option<PlayerId>,
    repo: &dyn ProgressRepository,
) -> ProgressRecord {
    let Some(player_id) = player_id else {
        return ProgressRecord::default();
    };
    match repo.load(player_id).await {
        Ok(record) => record.unwrap_or_default(),
        Err(e) => {
            warn!(player_id = %player_id, error = %e, "progress read failed; using default");
            ProgressRecord::default()
        }
    }
}
