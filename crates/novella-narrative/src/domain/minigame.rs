//! Minigame gate: pauses advancement on a minigame event until the external
//! minigame reports an outcome. Branching on the outcome is left to the host.

use novella_content::domain::chapter::MinigameDescriptor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::engine::NarrativeStateMachine;
use super::events::EngineSignal;
use super::state::EngineState;

/// How a minigame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinigameOutcome {
    /// The player won.
    Success,
    /// The player lost.
    Failure,
}

impl NarrativeStateMachine {
    /// The minigame the engine is waiting on.
    #[must_use]
    pub fn pending_minigame(&self) -> Option<&MinigameDescriptor> {
        if self.state != EngineState::MinigamePaused {
            return None;
        }
        self.current_event()?.minigame.as_ref()
    }

    /// Resumes play after the pending minigame. Ignored unless paused.
    pub fn resolve(&mut self, outcome: MinigameOutcome) -> Option<EngineSignal> {
        let Some(minigame) = self.pending_minigame() else {
            debug!(state = ?self.state, ?outcome, "minigame outcome ignored");
            return None;
        };
        let kind = minigame.kind.clone();
        let target = match outcome {
            MinigameOutcome::Success => minigame.on_success.clone(),
            MinigameOutcome::Failure => minigame.on_failure.clone(),
        };

        self.state = EngineState::Playing;
        info!(kind = %kind, ?outcome, "minigame resolved");
        Some(EngineSignal::MinigameResolved {
            kind,
            outcome,
            target,
        })
    }
}
