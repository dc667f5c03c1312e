//! Intro/outro overlays. Dismissed only by `acknowledge` or `decline`, never
//! by time.

use std::sync::Arc;

use tracing::{debug, info};

use super::engine::NarrativeStateMachine;
use super::events::EngineSignal;
use super::position::Position;
use super::state::{EngineState, Overlay};

impl NarrativeStateMachine {
    /// The overlay currently awaiting a decision.
    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        let chapter_id = self.position.chapter_id;
        match self.state {
            EngineState::IntroOverlay if self.boot_intro_pending => {
                Some(Overlay::BootIntro { chapter_id })
            }
            EngineState::IntroOverlay => Some(Overlay::ChapterIntro { chapter_id }),
            EngineState::ChapterOutro => Some(Overlay::ChapterOutro { chapter_id }),
            _ => None,
        }
    }

    /// Proceeds past the current overlay. From an intro this starts play at
    /// the first dialog; from an outro it requests the next chapter, or
    /// finishes the story after the final chapter. A no-op without an overlay.
    pub fn acknowledge(&mut self) -> Option<EngineSignal> {
        match self.state {
            EngineState::IntroOverlay => {
                let chapter = Arc::clone(self.chapter.as_ref()?);
                self.boot_intro_pending = false;
                self.position = Position::start_of(chapter.id);
                self.enter_event();
                info!(chapter_id = %chapter.id, "chapter started");
                Some(EngineSignal::ChapterStarted {
                    chapter_id: chapter.id,
                })
            }
            EngineState::ChapterOutro => {
                let completed = self.position.chapter_id;
                match completed.next() {
                    Some(next) if completed < self.final_chapter => {
                        let ticket = self.jump_to_chapter(next);
                        Some(EngineSignal::ChapterRequested { ticket })
                    }
                    _ => {
                        self.chapter = None;
                        self.state = EngineState::Finished;
                        info!(chapter_id = %completed, "story finished");
                        Some(EngineSignal::StoryFinished)
                    }
                }
            }
            state => {
                debug!(state = ?state, "acknowledge ignored; no overlay");
                None
            }
        }
    }

    /// Leaves the current overlay for the neutral menu. A no-op without an
    /// overlay.
    pub fn decline(&mut self) -> Option<EngineSignal> {
        match self.state {
            EngineState::IntroOverlay | EngineState::ChapterOutro => {
                self.chapter = None;
                self.state = EngineState::Menu;
                info!(chapter_id = %self.position.chapter_id, "overlay declined");
                Some(EngineSignal::ReturnedToMenu)
            }
            state => {
                debug!(state = ?state, "decline ignored; no overlay");
                None
            }
        }
    }
}
