//! Content source and progress repository abstractions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChapterId, PlayerId};

/// Encoding of a raw chapter document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// `chapter{id}.json`
    Json,
    /// `chapter{id}.yaml`
    Yaml,
}

/// Raw chapter content as fetched from a source, before parsing.
#[derive(Debug, Clone)]
pub struct RawChapter {
    /// Encoding of `body`.
    pub format: ContentFormat,
    /// The document text.
    pub body: String,
}

/// Source of chapter documents keyed by chapter id.
#[async_trait]
pub trait ChapterSource: Send + Sync {
    /// Fetch the raw document for a chapter. `Ok(None)` means no content
    /// exists for the id.
    async fn fetch(&self, chapter_id: ChapterId) -> Result<Option<RawChapter>, DomainError>;
}

/// Stored unlock/completion watermark for a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Most recently completed chapter number (0 when none).
    pub chapters_completed: u32,
    /// Highest chapter number the player may open (at least 1).
    pub chapters_unlocked: u32,
    /// When the record was last written, if ever.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            chapters_completed: 0,
            chapters_unlocked: 1,
            updated_at: None,
        }
    }
}

/// Repository trait for reading and writing player progress.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the stored record for a player, if any.
    async fn load(&self, player_id: PlayerId) -> Result<Option<ProgressRecord>, DomainError>;

    /// Persist the record for a player. Implementations must never lower a
    /// stored `chapters_unlocked`.
    async fn save(&self, player_id: PlayerId, record: &ProgressRecord) -> Result<(), DomainError>;
}
