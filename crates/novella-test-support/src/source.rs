//! Test chapter sources — mock `ChapterSource` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use novella_core::error::DomainError;
use novella_core::ids::ChapterId;
use novella_core::repository::{ChapterSource, ContentFormat, RawChapter};

/// A chapter source backed by in-memory JSON documents. Counts fetches per
/// chapter and can delay individual chapters to exercise superseded loads.
#[derive(Debug, Default)]
pub struct InMemoryChapterSource {
    documents: HashMap<u32, String>,
    delays: HashMap<u32, Duration>,
    fetches: Mutex<HashMap<u32, usize>>,
}

impl InMemoryChapterSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a JSON document for chapter `id`.
    #[must_use]
    pub fn with_json(mut self, id: u32, body: impl Into<String>) -> Self {
        self.documents.insert(id, body.into());
        self
    }

    /// Make fetches of chapter `id` sleep for `delay` first.
    #[must_use]
    pub fn with_delay(mut self, id: u32, delay: Duration) -> Self {
        self.delays.insert(id, delay);
        self
    }

    /// How many times chapter `id` has been fetched.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fetch_count(&self, id: u32) -> usize {
        self.fetches.lock().unwrap().get(&id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ChapterSource for InMemoryChapterSource {
    async fn fetch(&self, chapter_id: ChapterId) -> Result<Option<RawChapter>, DomainError> {
        let id = chapter_id.get();
        *self.fetches.lock().unwrap().entry(id).or_insert(0) += 1;
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self.documents.get(&id).map(|body| RawChapter {
            format: ContentFormat::Json,
            body: body.clone(),
        }))
    }
}

/// A chapter source that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingChapterSource;

#[async_trait]
impl ChapterSource for FailingChapterSource {
    async fn fetch(&self, _chapter_id: ChapterId) -> Result<Option<RawChapter>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
