//! Player commands for the Narrative Engine context.

use novella_core::command::Command;
use novella_core::ids::ChapterId;
use serde::{Deserialize, Serialize};

use super::minigame::MinigameOutcome;

/// Every input a player (or the minigame host) can feed the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Move to the next dialog.
    Advance,
    /// Finish the text reveal if it is still running, otherwise advance.
    Continue,
    /// Finish the text reveal immediately.
    SkipText,
    /// Dismiss the current overlay and proceed.
    Acknowledge,
    /// Dismiss the current overlay back to the menu.
    Decline,
    /// Report the outcome of the pending minigame.
    ResolveMinigame {
        /// How the minigame ended.
        outcome: MinigameOutcome,
    },
    /// Load a chapter and show its intro.
    JumpToChapter {
        /// Chapter to load.
        chapter_id: ChapterId,
    },
    /// Re-request a chapter whose load failed.
    RetryLoad,
    /// Answer the one-time audio prompt.
    DecideAudio {
        /// Whether sound may play.
        accept: bool,
    },
}

impl Command for PlayerCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Advance => "narrative.advance",
            Self::Continue => "narrative.continue",
            Self::SkipText => "narrative.skip_text",
            Self::Acknowledge => "narrative.acknowledge",
            Self::Decline => "narrative.decline",
            Self::ResolveMinigame { .. } => "narrative.resolve_minigame",
            Self::JumpToChapter { .. } => "narrative.jump_to_chapter",
            Self::RetryLoad => "narrative.retry_load",
            Self::DecideAudio { .. } => "narrative.decide_audio",
        }
    }
}
