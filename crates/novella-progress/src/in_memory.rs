//! Process-local progress repository.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use novella_core::error::DomainError;
use novella_core::ids::PlayerId;
use novella_core::repository::{ProgressRecord, ProgressRepository};

/// Progress repository held in memory. Used when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryProgressRepository {
    records: Mutex<HashMap<PlayerId, ProgressRecord>>,
}

impl InMemoryProgressRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn load(&self, player_id: PlayerId) -> Result<Option<ProgressRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&player_id)
            .copied())
    }

    async fn save(&self, player_id: PlayerId, record: &ProgressRecord) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = records.entry(player_id).or_default();
        entry.chapters_completed = record.chapters_completed;
        entry.chapters_unlocked = entry.chapters_unlocked.max(record.chapters_unlocked);
        entry.updated_at = record.updated_at;
        Ok(())
    }
}
