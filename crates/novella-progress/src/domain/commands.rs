//! Commands for the Player Progress context.

use novella_core::command::Command;
use novella_core::ids::{ChapterId, PlayerId};

/// Command to record that a player finished a chapter.
#[derive(Debug, Clone, Copy)]
pub struct RecordCompletion {
    /// The player, or `None` when the identity could not be resolved.
    pub player_id: Option<PlayerId>,
    /// The chapter just completed.
    pub chapter_id: ChapterId,
}

impl Command for RecordCompletion {
    fn command_type(&self) -> &'static str {
        "progress.record_completion"
    }
}
