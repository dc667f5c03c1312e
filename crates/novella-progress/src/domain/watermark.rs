//! Unlock watermark arithmetic.

use chrono::{DateTime, Utc};
use novella_core::ids::ChapterId;
use novella_core::repository::ProgressRecord;

/// Applies a chapter completion to an existing record.
///
/// `chapters_completed` becomes `completed`; `chapters_unlocked` becomes
/// `max(existing, completed + 1)` and so never regresses, even when
/// completions arrive out of order or are retried.
#[must_use]
pub fn apply_completion(
    existing: ProgressRecord,
    completed: ChapterId,
    at: DateTime<Utc>,
) -> ProgressRecord {
    let completed = completed.get();
    ProgressRecord {
        chapters_completed: completed,
        chapters_unlocked: existing
            .chapters_unlocked
            .max(completed.saturating_add(1)),
        updated_at: Some(at),
    }
}
