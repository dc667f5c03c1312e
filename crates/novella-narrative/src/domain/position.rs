//! Position within the loaded chapter.

use novella_core::ids::ChapterId;
use serde::Serialize;

/// Where the reader is: chapter, then zero-based scenario, event and dialog
/// indices into that chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// The chapter being read.
    pub chapter_id: ChapterId,
    /// Index into the chapter's scenarios.
    pub scenario: usize,
    /// Index into the scenario's events.
    pub event: usize,
    /// Index into the event's dialogs.
    pub dialog: usize,
}

impl Position {
    /// The first dialog of `chapter_id`.
    #[must_use]
    pub fn start_of(chapter_id: ChapterId) -> Self {
        Self {
            chapter_id,
            scenario: 0,
            event: 0,
            dialog: 0,
        }
    }
}
