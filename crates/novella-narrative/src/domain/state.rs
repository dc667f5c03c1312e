//! Engine state and overlays.

use novella_core::ids::ChapterId;
use serde::Serialize;

/// The single source of truth for what the engine is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// A chapter load is pending or has failed.
    Booting,
    /// The boot or chapter intro is showing.
    IntroOverlay,
    /// Dialog is advancing.
    Playing,
    /// Waiting for a minigame outcome.
    MinigamePaused,
    /// The chapter outro is showing.
    ChapterOutro,
    /// The final chapter was completed. Terminal for `advance`.
    Finished,
    /// The player declined an overlay; nothing is loaded.
    Menu,
}

/// Overlay awaiting an explicit acknowledge/decline. Never auto-dismisses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    /// First intro of the session.
    BootIntro {
        /// Chapter that starts on acknowledgement.
        chapter_id: ChapterId,
    },
    /// Intro for a later chapter.
    ChapterIntro {
        /// Chapter that starts on acknowledgement.
        chapter_id: ChapterId,
    },
    /// Shown after the last dialog of a chapter.
    ChapterOutro {
        /// The chapter just completed.
        chapter_id: ChapterId,
    },
}
