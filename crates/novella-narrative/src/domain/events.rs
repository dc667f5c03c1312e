//! Signals emitted by engine transitions.

use novella_core::event::DomainEvent;
use novella_core::ids::ChapterId;
use serde::Serialize;

use super::engine::LoadTicket;
use super::minigame::MinigameOutcome;
use super::position::Position;

/// What a transition did. Returned by every state-changing operation so the
/// driver can react (start text, fetch a chapter, sync progress).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineSignal {
    /// Moved to the next dialog within the same event.
    DialogAdvanced {
        /// New position.
        position: Position,
    },
    /// Entered a new event, possibly pausing for its minigame.
    EventEntered {
        /// New position.
        position: Position,
        /// Event title.
        title: String,
        /// Minigame kind, when the event pauses for one.
        minigame: Option<String>,
    },
    /// The intro was acknowledged and play began.
    ChapterStarted {
        /// The chapter now playing.
        chapter_id: ChapterId,
    },
    /// The last dialog of a chapter was passed.
    ChapterCompleted {
        /// The chapter just completed.
        chapter_id: ChapterId,
    },
    /// A chapter load was requested and must be fulfilled with this ticket.
    ChapterRequested {
        /// Ticket to complete the load with.
        ticket: LoadTicket,
    },
    /// The pending minigame was resolved and play resumed.
    MinigameResolved {
        /// Minigame kind.
        kind: String,
        /// Reported outcome.
        outcome: MinigameOutcome,
        /// The descriptor's target for that outcome, uninterpreted.
        target: Option<String>,
    },
    /// An overlay was declined.
    ReturnedToMenu,
    /// The final chapter's outro was acknowledged.
    StoryFinished,
}

impl DomainEvent for EngineSignal {
    fn event_type(&self) -> &'static str {
        match self {
            Self::DialogAdvanced { .. } => "narrative.dialog_advanced",
            Self::EventEntered { .. } => "narrative.event_entered",
            Self::ChapterStarted { .. } => "narrative.chapter_started",
            Self::ChapterCompleted { .. } => "narrative.chapter_completed",
            Self::ChapterRequested { .. } => "narrative.chapter_requested",
            Self::MinigameResolved { .. } => "narrative.minigame_resolved",
            Self::ReturnedToMenu => "narrative.returned_to_menu",
            Self::StoryFinished => "narrative.story_finished",
        }
    }
}

#[cfg(test)]
mod tests {
    use novella_core::event::DomainEvent;
    use novella_core::ids::ChapterId;

    use super::EngineSignal;

    #[test]
    fn test_signal_type_matches_serialized_tag() {
        // Arrange
        let signal = EngineSignal::ChapterCompleted {
            chapter_id: ChapterId::new(3).unwrap(),
        };

        // Act
        let json = serde_json::to_value(&signal).unwrap();

        // Assert
        assert_eq!(signal.event_type(), "narrative.chapter_completed");
        assert_eq!(json["type"], "chapter_completed");
        assert_eq!(json["chapter_id"], 3);
    }

    #[test]
    fn test_unit_signals_have_stable_names() {
        assert_eq!(EngineSignal::ReturnedToMenu.event_type(), "narrative.returned_to_menu");
        assert_eq!(EngineSignal::StoryFinished.event_type(), "narrative.story_finished");
    }
}
