//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use novella_content::application::chapter_store::ChapterStore;
use novella_core::clock::Clock;
use novella_core::repository::{ChapterSource, ProgressRepository};
use novella_narrative::application::player::{EngineConfig, StoryPlayer};
use tracing::info;
use uuid::Uuid;

/// A running engine session. Commands on one session are serialised by the
/// async mutex.
pub type SessionHandle = Arc<tokio::sync::Mutex<StoryPlayer>>;

/// Live sessions kept before the oldest is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// In-process registry of engine sessions keyed by session id.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRegistry {
    /// Creates a registry holding at most `max_sessions` sessions.
    #[must_use]
    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Registers `player` under a fresh id, evicting the oldest sessions
    /// when the registry is full.
    pub fn insert(&self, player: StoryPlayer) -> Uuid {
        let id = Uuid::now_v7();
        let mut sessions = self.lock();
        // v7 ids sort by creation time.
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions.keys().min().copied() else {
                break;
            };
            sessions.remove(&oldest);
            info!(session_id = %oldest, "session evicted");
        }
        sessions.insert(id, Arc::new(tokio::sync::Mutex::new(player)));
        id
    }

    /// Looks up a session.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.lock().get(&id).cloned()
    }

    /// Removes a session, returning it if it existed.
    pub fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        self.lock().remove(&id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Raw chapter documents; each session caches over it separately.
    pub chapter_source: Arc<dyn ChapterSource>,
    /// App-wide chapter cache used by the content endpoints.
    pub chapters: Arc<ChapterStore>,
    /// Player progress store.
    pub progress_repository: Arc<dyn ProgressRepository>,
    /// Clock for deterministic timestamps.
    pub clock: Arc<dyn Clock>,
    /// Engine tunables for new sessions.
    pub engine: EngineConfig,
    /// Live engine sessions.
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        chapter_source: Arc<dyn ChapterSource>,
        progress_repository: Arc<dyn ProgressRepository>,
        clock: Arc<dyn Clock>,
        engine: EngineConfig,
    ) -> Self {
        Self {
            chapters: Arc::new(ChapterStore::new(Arc::clone(&chapter_source))),
            chapter_source,
            progress_repository,
            clock,
            engine,
            sessions: SessionRegistry::default(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
