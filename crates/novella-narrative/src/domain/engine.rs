//! The narrative state machine.
//!
//! Holds the loaded chapter, the reader's [`Position`] and the single
//! [`EngineState`]. All transitions are synchronous; chapter fetching is
//! requested through a [`LoadTicket`] and completed by the driver.

use std::sync::Arc;

use novella_content::domain::chapter::{Chapter, Dialog, Event};
use novella_core::error::DomainError;
use novella_core::ids::ChapterId;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::events::EngineSignal;
use super::position::Position;
use super::state::EngineState;

/// Identifies one chapter load request. Only the most recent ticket can
/// complete a load; results for older tickets are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadTicket {
    /// Chapter requested.
    pub chapter_id: ChapterId,
    /// Request counter at issue time.
    pub generation: u64,
}

/// Classification of a failed chapter load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailureKind {
    /// No content exists for the chapter.
    NotFound,
    /// The content violates the chapter schema.
    MalformedContent,
    /// The source could not be reached.
    Unavailable,
}

/// Error flag kept while the engine sits in `Booting` after a failed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Chapter whose load failed.
    pub chapter_id: ChapterId,
    /// What went wrong.
    pub kind: LoadFailureKind,
    /// Human-readable detail.
    pub message: String,
}

impl LoadFailure {
    fn from_error(chapter_id: ChapterId, error: &DomainError) -> Self {
        let kind = match error {
            DomainError::ChapterNotFound(_) => LoadFailureKind::NotFound,
            DomainError::MalformedContent { .. } => LoadFailureKind::MalformedContent,
            _ => LoadFailureKind::Unavailable,
        };
        Self {
            chapter_id,
            kind,
            message: error.to_string(),
        }
    }
}

/// Chapter/scenario/event/dialog progression with a single owned state.
#[derive(Debug)]
pub struct NarrativeStateMachine {
    pub(crate) final_chapter: ChapterId,
    pub(crate) chapter: Option<Arc<Chapter>>,
    pub(crate) position: Position,
    pub(crate) state: EngineState,
    pub(crate) boot_intro_pending: bool,
    generation: u64,
    load_failure: Option<LoadFailure>,
}

impl NarrativeStateMachine {
    /// Creates a machine in `Booting` with a load requested for
    /// `first_chapter`. `final_chapter` is the last chapter of the story.
    #[must_use]
    pub fn start(first_chapter: ChapterId, final_chapter: ChapterId) -> (Self, LoadTicket) {
        let mut machine = Self {
            final_chapter,
            chapter: None,
            position: Position::start_of(first_chapter),
            state: EngineState::Booting,
            boot_intro_pending: true,
            generation: 0,
            load_failure: None,
        };
        let ticket = machine.jump_to_chapter(first_chapter);
        (machine, ticket)
    }

    /// Current engine state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current position. Indices are zero while booting.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The loaded chapter, if any.
    #[must_use]
    pub fn chapter(&self) -> Option<&Arc<Chapter>> {
        self.chapter.as_ref()
    }

    /// Last chapter of the story.
    #[must_use]
    pub fn final_chapter(&self) -> ChapterId {
        self.final_chapter
    }

    /// Why the most recent load failed, while still booting.
    #[must_use]
    pub fn load_failure(&self) -> Option<&LoadFailure> {
        self.load_failure.as_ref()
    }

    /// The event at the current position.
    #[must_use]
    pub fn current_event(&self) -> Option<&Event> {
        if self.state == EngineState::Finished {
            return None;
        }
        let p = self.position;
        self.chapter
            .as_ref()?
            .scenarios
            .get(p.scenario)?
            .events
            .get(p.event)
    }

    /// The dialog at the current position, or `None` if no chapter is loaded.
    #[must_use]
    pub fn current_dialog(&self) -> Option<&Dialog> {
        self.current_event()?.dialogs.get(self.position.dialog)
    }

    /// Requests `chapter_id`: supersedes any outstanding load, resets the
    /// position and enters `Booting` until the ticket is completed.
    pub fn jump_to_chapter(&mut self, chapter_id: ChapterId) -> LoadTicket {
        self.generation += 1;
        self.chapter = None;
        self.position = Position::start_of(chapter_id);
        self.state = EngineState::Booting;
        self.load_failure = None;
        info!(chapter_id = %chapter_id, generation = self.generation, "chapter requested");
        LoadTicket {
            chapter_id,
            generation: self.generation,
        }
    }

    /// Re-requests the current chapter after a failed load.
    pub fn retry_load(&mut self) -> Option<LoadTicket> {
        if self.state != EngineState::Booting || self.load_failure.is_none() {
            debug!(state = ?self.state, "retry ignored; no failed load");
            return None;
        }
        Some(self.jump_to_chapter(self.position.chapter_id))
    }

    /// Completes a load. Returns `false` (and changes nothing) when `ticket`
    /// has been superseded. On success the intro overlay shows; on failure the
    /// engine stays in `Booting` with [`load_failure`](Self::load_failure) set.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Arc<Chapter>, DomainError>,
    ) -> bool {
        if ticket.generation != self.generation || self.state != EngineState::Booting {
            debug!(
                chapter_id = %ticket.chapter_id,
                generation = ticket.generation,
                current = self.generation,
                "stale chapter load dropped"
            );
            return false;
        }
        match result {
            Ok(chapter) => {
                self.chapter = Some(chapter);
                self.state = EngineState::IntroOverlay;
            }
            Err(e) => {
                warn!(chapter_id = %ticket.chapter_id, error = %e, "chapter load failed");
                self.load_failure = Some(LoadFailure::from_error(ticket.chapter_id, &e));
            }
        }
        true
    }

    /// Moves to the next dialog, event, scenario or, past the last dialog,
    /// completes the chapter. A no-op unless `Playing`.
    pub fn advance(&mut self) -> Option<EngineSignal> {
        if self.state != EngineState::Playing {
            debug!(state = ?self.state, "advance ignored");
            return None;
        }
        let chapter = Arc::clone(self.chapter.as_ref()?);
        let p = self.position;
        let scenario = chapter.scenarios.get(p.scenario)?;
        let event = scenario.events.get(p.event)?;

        if p.dialog + 1 < event.dialogs.len() {
            self.position.dialog += 1;
            return Some(EngineSignal::DialogAdvanced {
                position: self.position,
            });
        }
        if p.event + 1 < scenario.events.len() {
            self.position = Position {
                event: p.event + 1,
                dialog: 0,
                ..p
            };
            return self.enter_event();
        }
        if p.scenario + 1 < chapter.scenarios.len() {
            self.position = Position {
                scenario: p.scenario + 1,
                event: 0,
                dialog: 0,
                ..p
            };
            return self.enter_event();
        }

        self.state = EngineState::ChapterOutro;
        info!(chapter_id = %chapter.id, "chapter completed");
        Some(EngineSignal::ChapterCompleted {
            chapter_id: chapter.id,
        })
    }

    /// Settles the state for the event at the current position: paused when
    /// it declares a minigame, playing otherwise.
    pub(crate) fn enter_event(&mut self) -> Option<EngineSignal> {
        let (title, minigame) = {
            let event = self.current_event()?;
            (
                event.title.clone(),
                event.minigame.as_ref().map(|m| m.kind.clone()),
            )
        };
        self.state = if minigame.is_some() {
            EngineState::MinigamePaused
        } else {
            EngineState::Playing
        };
        Some(EngineSignal::EventEntered {
            position: self.position,
            title,
            minigame,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use novella_content::domain::chapter::Chapter;
    use novella_content::domain::parse::parse_chapter;
    use novella_core::error::DomainError;
    use novella_core::ids::ChapterId;
    use novella_core::repository::{ContentFormat, RawChapter};
    use novella_test_support::{chapter_json, chapter_json_with_minigame};

    use super::*;

    pub(crate) fn chapter(id: u32, body: String) -> Arc<Chapter> {
        let raw = RawChapter {
            format: ContentFormat::Json,
            body,
        };
        Arc::new(parse_chapter(ChapterId::new(id).unwrap(), &raw).unwrap())
    }

    /// A machine sitting in `Playing` at the start of chapter 1.
    pub(crate) fn playing(body: String, final_chapter: u32) -> NarrativeStateMachine {
        let (mut machine, ticket) =
            NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::new(final_chapter).unwrap());
        assert!(machine.complete_load(ticket, Ok(chapter(1, body))));
        machine.acknowledge();
        assert_eq!(machine.state(), EngineState::Playing);
        machine
    }

    #[test]
    fn test_start_requests_first_chapter_and_boots() {
        let (machine, ticket) = NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::FIRST);

        assert_eq!(machine.state(), EngineState::Booting);
        assert_eq!(ticket.chapter_id, ChapterId::FIRST);
        assert!(machine.current_dialog().is_none());
    }

    #[test]
    fn test_complete_load_shows_intro_overlay() {
        // Arrange
        let (mut machine, ticket) = NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::FIRST);

        // Act
        let applied = machine.complete_load(ticket, Ok(chapter(1, chapter_json(&[&[2]]))));

        // Assert
        assert!(applied);
        assert_eq!(machine.state(), EngineState::IntroOverlay);
        assert_eq!(machine.current_dialog().unwrap().text, "s0e0d0");
    }

    #[test]
    fn test_advance_within_event_increments_only_dialog() {
        // Arrange
        let mut machine = playing(chapter_json(&[&[3, 2], &[1]]), 1);

        // Act
        let signal = machine.advance();

        // Assert
        let position = machine.position();
        assert_eq!((position.scenario, position.event, position.dialog), (0, 0, 1));
        assert!(matches!(signal, Some(EngineSignal::DialogAdvanced { .. })));
        assert_eq!(machine.current_dialog().unwrap().text, "s0e0d1");
    }

    #[test]
    fn test_advance_walks_events_then_scenarios() {
        let mut machine = playing(chapter_json(&[&[1, 1], &[1]]), 1);

        let to_event = machine.advance();
        assert_eq!(machine.current_dialog().unwrap().text, "s0e1d0");
        assert!(matches!(
            to_event,
            Some(EngineSignal::EventEntered { ref title, minigame: None, .. }) if title == "Event 0.1"
        ));

        machine.advance();
        let position = machine.position();
        assert_eq!((position.scenario, position.event, position.dialog), (1, 0, 0));
        assert_eq!(machine.state(), EngineState::Playing);
    }

    #[test]
    fn test_advance_past_last_dialog_completes_chapter() {
        // Arrange: one scenario, one event, two dialogs.
        let mut machine = playing(chapter_json(&[&[2]]), 2);

        // Act
        let first = machine.advance();
        let second = machine.advance();

        // Assert
        assert!(matches!(first, Some(EngineSignal::DialogAdvanced { .. })));
        assert_eq!(
            second,
            Some(EngineSignal::ChapterCompleted {
                chapter_id: ChapterId::FIRST
            })
        );
        assert_eq!(machine.state(), EngineState::ChapterOutro);
    }

    #[test]
    fn test_three_dialog_event_completes_on_third_advance() {
        let mut machine = playing(chapter_json(&[&[3]]), 2);

        machine.advance();
        machine.advance();
        assert_eq!(machine.state(), EngineState::Playing);
        let third = machine.advance();

        assert!(matches!(third, Some(EngineSignal::ChapterCompleted { .. })));
        assert_eq!(machine.state(), EngineState::ChapterOutro);
    }

    #[test]
    fn test_advance_outside_playing_never_moves_position() {
        // Arrange
        let mut machine = playing(chapter_json(&[&[1]]), 2);
        machine.advance();
        assert_eq!(machine.state(), EngineState::ChapterOutro);
        let before = machine.position();

        // Act
        let signal = machine.advance();

        // Assert
        assert!(signal.is_none());
        assert_eq!(machine.position(), before);
        assert_eq!(machine.state(), EngineState::ChapterOutro);
    }

    #[test]
    fn test_advance_while_booting_is_a_no_op() {
        let (mut machine, _) = NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::FIRST);

        assert!(machine.advance().is_none());
        assert_eq!(machine.state(), EngineState::Booting);
    }

    #[test]
    fn test_entering_minigame_event_pauses() {
        // Arrange
        let body = chapter_json_with_minigame(&[&[1, 2]], &[(0, 1, "lockpick")]);
        let mut machine = playing(body, 1);

        // Act
        let signal = machine.advance();

        // Assert
        assert_eq!(machine.state(), EngineState::MinigamePaused);
        assert!(matches!(
            signal,
            Some(EngineSignal::EventEntered { minigame: Some(ref kind), .. }) if kind == "lockpick"
        ));
        let before = machine.position();
        assert!(machine.advance().is_none());
        assert_eq!(machine.position(), before);
    }

    #[test]
    fn test_entering_minigame_via_new_scenario_pauses() {
        let body = chapter_json_with_minigame(&[&[1], &[1]], &[(1, 0, "quiz")]);
        let mut machine = playing(body, 1);

        machine.advance();

        assert_eq!(machine.state(), EngineState::MinigamePaused);
    }

    #[test]
    fn test_stale_load_is_dropped() {
        // Arrange
        let (mut machine, stale) = NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::FIRST);
        let second = ChapterId::new(2).unwrap();
        let fresh = machine.jump_to_chapter(second);

        // Act
        let applied_stale = machine.complete_load(stale, Ok(chapter(1, chapter_json(&[&[1]]))));

        // Assert
        assert!(!applied_stale);
        assert_eq!(machine.state(), EngineState::Booting);
        assert!(machine.chapter().is_none());

        assert!(machine.complete_load(fresh, Ok(chapter(2, chapter_json(&[&[1]])))));
        assert_eq!(machine.chapter().unwrap().id, second);
        assert_eq!(machine.position().chapter_id, second);
    }

    #[test]
    fn test_failed_load_stays_booting_with_error_flag() {
        // Arrange
        let (mut machine, ticket) = NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::FIRST);

        // Act
        let applied =
            machine.complete_load(ticket, Err(DomainError::ChapterNotFound(ChapterId::FIRST)));

        // Assert
        assert!(applied);
        assert_eq!(machine.state(), EngineState::Booting);
        let failure = machine.load_failure().unwrap();
        assert_eq!(failure.kind, LoadFailureKind::NotFound);
        assert!(machine.current_dialog().is_none());
        assert!(machine.advance().is_none());
    }

    #[test]
    fn test_retry_load_issues_new_ticket_only_after_failure() {
        let (mut machine, ticket) = NarrativeStateMachine::start(ChapterId::FIRST, ChapterId::FIRST);
        assert!(machine.retry_load().is_none());

        machine.complete_load(
            ticket,
            Err(DomainError::MalformedContent {
                chapter_id: ChapterId::FIRST,
                reason: "scenarios is empty".to_owned(),
            }),
        );
        let retry = machine.retry_load().unwrap();

        assert!(retry.generation > ticket.generation);
        assert_eq!(retry.chapter_id, ChapterId::FIRST);
        assert!(machine.load_failure().is_none());
    }

    #[test]
    fn test_jump_to_chapter_resets_position() {
        let mut machine = playing(chapter_json(&[&[3]]), 3);
        machine.advance();

        let ticket = machine.jump_to_chapter(ChapterId::new(3).unwrap());

        assert_eq!(machine.state(), EngineState::Booting);
        assert_eq!(machine.position(), Position::start_of(ticket.chapter_id));
        assert!(machine.current_dialog().is_none());
    }
}
