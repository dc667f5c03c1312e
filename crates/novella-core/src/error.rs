//! Domain error types.

use thiserror::Error;

use uuid::Uuid;

use crate::ids::ChapterId;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No content exists for the requested chapter.
    #[error("chapter not found: {0}")]
    ChapterNotFound(ChapterId),

    /// Chapter content violates the chapter schema.
    #[error("malformed content in chapter {chapter_id}: {reason}")]
    MalformedContent {
        /// The chapter whose content failed to parse or validate.
        chapter_id: ChapterId,
        /// What was wrong with it.
        reason: String,
    },

    /// The caller's identity could not be resolved.
    #[error("identity could not be resolved")]
    Unauthenticated,

    /// The player has not unlocked the requested chapter yet.
    #[error("chapter {chapter_id} is locked (unlocked up to {unlocked})")]
    ChapterLocked {
        /// The requested chapter.
        chapter_id: ChapterId,
        /// The player's current unlock watermark.
        unlocked: u32,
    },

    /// No engine session exists with the given id.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
