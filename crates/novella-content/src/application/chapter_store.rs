//! Per-session chapter cache in front of a `ChapterSource`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use novella_core::error::DomainError;
use novella_core::ids::ChapterId;
use novella_core::repository::ChapterSource;
use tracing::{debug, info, instrument};

use crate::domain::chapter::Chapter;
use crate::domain::parse::parse_chapter;

/// Loads chapters by id, validating them once and caching the result for the
/// lifetime of the store.
pub struct ChapterStore {
    source: Arc<dyn ChapterSource>,
    cache: Mutex<HashMap<ChapterId, Arc<Chapter>>>,
}

impl ChapterStore {
    /// Creates an empty store over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ChapterSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the chapter for `chapter_id`, fetching and validating it on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ChapterNotFound` if the source has no content for
    /// the id, `DomainError::MalformedContent` if the content fails
    /// validation, or the source's own error if fetching fails. Failures are
    /// not cached.
    #[instrument(skip(self), fields(chapter_id = %chapter_id))]
    pub async fn load(&self, chapter_id: ChapterId) -> Result<Arc<Chapter>, DomainError> {
        if let Some(chapter) = self.cached(chapter_id) {
            debug!("chapter served from cache");
            return Ok(chapter);
        }

        let raw = self
            .source
            .fetch(chapter_id)
            .await?
            .ok_or(DomainError::ChapterNotFound(chapter_id))?;
        let chapter = Arc::new(parse_chapter(chapter_id, &raw)?);

        info!(
            scenarios = chapter.scenarios.len(),
            dialogs = chapter.dialog_count(),
            content_hash = %chapter.content_hash,
            "chapter loaded"
        );

        // A concurrent load of the same id may have won; keep the first entry.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(chapter_id).or_insert(chapter)))
    }

    /// Returns the cached chapter without touching the source.
    #[must_use]
    pub fn cached(&self, chapter_id: ChapterId) -> Option<Arc<Chapter>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chapter_id)
            .cloned()
    }
}

impl std::fmt::Debug for ChapterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.cache.lock().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("ChapterStore")
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}
