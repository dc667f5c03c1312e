//! Shared test mocks and utilities for the Novella visual-novel engine.

mod clock;
mod fixtures;
mod repository;
mod source;

pub use clock::FixedClock;
pub use fixtures::{chapter_json, chapter_json_with_minigame};
pub use repository::{FailingProgressRepository, RecordingProgressRepository};
pub use source::{FailingChapterSource, InMemoryChapterSource};
