//! Command handlers for the Player Progress context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load the record, apply the command, persist.

use novella_core::clock::Clock;
use novella_core::error::DomainError;
use novella_core::repository::{ProgressRecord, ProgressRepository};
use serde::Serialize;
use tracing::info;

use crate::domain::commands::RecordCompletion;
use crate::domain::watermark::apply_completion;

/// Outcome of a progress write, shaped for the caller's UI.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReceipt {
    /// Whether the write was persisted.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// The record this write submitted. The store keeps the higher
    /// watermark, so it may hold more if a concurrent write landed first.
    pub progress: ProgressRecord,
}

/// Handles the `RecordCompletion` command: loads the player's record, applies
/// the monotonic watermark update, and persists it.
///
/// # Errors
///
/// Returns `DomainError::Unauthenticated` if the command carries no resolved
/// identity, or the repository's error if loading or saving fails.
pub async fn handle_record_completion(
    command: &RecordCompletion,
    clock: &dyn Clock,
    repo: &dyn ProgressRepository,
) -> Result<CompletionReceipt, DomainError> {
    let player_id = command.player_id.ok_or(DomainError::Unauthenticated)?;

    let existing = repo.load(player_id).await?.unwrap_or_default();
    let updated = apply_completion(existing, command.chapter_id, clock.now());
    repo.save(player_id, &updated).await?;

    info!(
        player_id = %player_id,
        chapter_id = %command.chapter_id,
        chapters_unlocked = updated.chapters_unlocked,
        "chapter completion recorded"
    );

    Ok(CompletionReceipt {
        success: true,
        message: format!(
            "Chapter {} completed; chapters up to {} unlocked",
            command.chapter_id, updated.chapters_unlocked
        ),
        progress: updated,
    })
}
