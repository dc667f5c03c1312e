//! Read model for rendering a session.

use novella_content::domain::chapter::{Dialog, MinigameDescriptor};
use serde::Serialize;

use super::player::StoryPlayer;
use crate::domain::audio::AudioConsent;
use crate::domain::engine::LoadFailure;
use crate::domain::position::Position;
use crate::domain::state::{EngineState, Overlay};

/// Everything a front end needs to draw the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineView {
    pub state: EngineState,
    pub overlay: Option<Overlay>,
    pub position: Position,
    pub loading: bool,
    pub event_title: Option<String>,
    pub dialog: Option<Dialog>,
    pub revealed_text: String,
    pub text_complete: bool,
    pub minigame: Option<MinigameDescriptor>,
    pub audio: AudioConsent,
    pub sound_enabled: bool,
    pub load_failure: Option<LoadFailure>,
}

/// Snapshots the player's current state.
#[must_use]
pub fn engine_view(player: &StoryPlayer) -> EngineView {
    let machine = player.machine();
    let typewriter = player.typewriter();
    let showing_dialog = matches!(
        machine.state(),
        EngineState::Playing | EngineState::MinigamePaused
    );

    EngineView {
        state: machine.state(),
        overlay: machine.overlay(),
        position: machine.position(),
        loading: player.is_loading(),
        event_title: machine.current_event().map(|e| e.title.clone()),
        dialog: machine.current_dialog().filter(|_| showing_dialog).cloned(),
        revealed_text: typewriter.revealed_text().to_owned(),
        text_complete: typewriter.is_complete(),
        minigame: machine.pending_minigame().cloned(),
        audio: player.audio().consent(),
        sound_enabled: player.audio().sound_enabled(),
        load_failure: machine.load_failure().cloned(),
    }
}
