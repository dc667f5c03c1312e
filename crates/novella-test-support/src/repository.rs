//! Test repositories — mock `ProgressRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use novella_core::error::DomainError;
use novella_core::ids::PlayerId;
use novella_core::repository::{ProgressRecord, ProgressRepository};

/// A progress repository that returns a configured record from every `load`
/// and records every `save`.
#[derive(Debug, Default)]
pub struct RecordingProgressRepository {
    load_result: Option<ProgressRecord>,
    saved: Mutex<Vec<(PlayerId, ProgressRecord)>>,
}

impl RecordingProgressRepository {
    /// Create a repository whose `load` always returns `load_result`.
    #[must_use]
    pub fn new(load_result: Option<ProgressRecord>) -> Self {
        Self {
            load_result,
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all saved records, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saved_records(&self) -> Vec<(PlayerId, ProgressRecord)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressRepository for RecordingProgressRepository {
    async fn load(&self, _player_id: PlayerId) -> Result<Option<ProgressRecord>, DomainError> {
        Ok(self.load_result)
    }

    async fn save(&self, player_id: PlayerId, record: &ProgressRecord) -> Result<(), DomainError> {
        self.saved.lock().unwrap().push((player_id, *record));
        Ok(())
    }
}

/// A progress repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingProgressRepository;

#[async_trait]
impl ProgressRepository for FailingProgressRepository {
    async fn load(&self, _player_id: PlayerId) -> Result<Option<ProgressRecord>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(&self, _player_id: PlayerId, _record: &ProgressRecord) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
