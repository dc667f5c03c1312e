//! Async driver around the narrative state machine.
//!
//! `StoryPlayer` is the single logical owner of engine state. It fulfils
//! chapter load requests on background tasks (aborting superseded ones),
//! restarts the typewriter whenever the dialog changes, and pushes chapter
//! completions to the progress store as best-effort fire-and-forget tasks.

use std::sync::Arc;
use std::time::Duration;

use novella_content::application::chapter_store::ChapterStore;
use novella_content::domain::chapter::Chapter;
use novella_core::clock::Clock;
use novella_core::command::Command;
use novella_core::error::DomainError;
use novella_core::event::DomainEvent;
use novella_core::ids::{ChapterId, PlayerId};
use novella_core::repository::ProgressRepository;
use novella_progress::application::command_handlers::handle_record_completion;
use novella_progress::domain::commands::RecordCompletion;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, info, warn};

use super::typewriter::{DEFAULT_CHAR_INTERVAL, TypewriterSequencer};
use crate::domain::audio::AudioConsentGate;
use crate::domain::commands::PlayerCommand;
use crate::domain::engine::{LoadTicket, NarrativeStateMachine};
use crate::domain::events::EngineSignal;

/// Engine tunables.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Last chapter of the story; acknowledging its outro finishes the story.
    pub final_chapter: ChapterId,
    /// Typewriter delay per character.
    pub typewriter_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            final_chapter: ChapterId::FIRST,
            typewriter_interval: DEFAULT_CHAR_INTERVAL,
        }
    }
}

/// Where chapter completions are reported.
#[derive(Clone)]
pub struct ProgressSync {
    /// The player, or `None` when the identity could not be resolved.
    pub player_id: Option<PlayerId>,
    /// Progress store.
    pub repository: Arc<dyn ProgressRepository>,
    /// Clock stamped onto written records.
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ProgressSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSync")
            .field("player_id", &self.player_id)
            .finish_non_exhaustive()
    }
}

type LoadResult = (LoadTicket, Result<Arc<Chapter>, DomainError>);

/// A single-player engine session.
#[derive(Debug)]
pub struct StoryPlayer {
    machine: NarrativeStateMachine,
    store: Arc<ChapterStore>,
    progress: ProgressSync,
    audio: AudioConsentGate,
    typewriter: TypewriterSequencer,
    loads_tx: mpsc::UnboundedSender<LoadResult>,
    loads_rx: mpsc::UnboundedReceiver<LoadResult>,
    in_flight: Option<AbortHandle>,
    sync_tasks: JoinSet<()>,
}

impl StoryPlayer {
    /// Boots a session at `first_chapter` and starts loading it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn start(
        config: EngineConfig,
        store: Arc<ChapterStore>,
        progress: ProgressSync,
        first_chapter: ChapterId,
    ) -> Self {
        let (machine, ticket) = NarrativeStateMachine::start(first_chapter, config.final_chapter);
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let mut player = Self {
            machine,
            store,
            progress,
            audio: AudioConsentGate::new(),
            typewriter: TypewriterSequencer::new(config.typewriter_interval),
            loads_tx,
            loads_rx,
            in_flight: None,
            sync_tasks: JoinSet::new(),
        };
        player.spawn_load(ticket);
        player
    }

    /// The underlying state machine.
    #[must_use]
    pub fn machine(&self) -> &NarrativeStateMachine {
        &self.machine
    }

    /// The text reveal for the current dialog.
    #[must_use]
    pub fn typewriter(&self) -> &TypewriterSequencer {
        &self.typewriter
    }

    /// The session's audio decision.
    #[must_use]
    pub fn audio(&self) -> &AudioConsentGate {
        &self.audio
    }

    /// The player this session reports progress for.
    #[must_use]
    pub fn player_id(&self) -> Option<PlayerId> {
        self.progress.player_id
    }

    /// Progress writes spawned but not yet reaped.
    #[must_use]
    pub fn pending_syncs(&self) -> usize {
        self.sync_tasks.len()
    }

    /// Whether a chapter load is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Applies one player command and reacts to the resulting signal.
    pub fn dispatch(&mut self, command: PlayerCommand) -> Option<EngineSignal> {
        debug!(command = command.command_type(), state = ?self.machine.state(), "dispatch");
        let signal = match command {
            PlayerCommand::Advance => self.machine.advance(),
            PlayerCommand::Continue if !self.typewriter.is_complete() => {
                self.typewriter.skip();
                None
            }
            PlayerCommand::Continue => self.machine.advance(),
            PlayerCommand::SkipText => {
                self.typewriter.skip();
                None
            }
            PlayerCommand::Acknowledge => self.machine.acknowledge(),
            PlayerCommand::Decline => self.machine.decline(),
            PlayerCommand::ResolveMinigame { outcome } => self.machine.resolve(outcome),
            PlayerCommand::JumpToChapter { chapter_id } => Some(EngineSignal::ChapterRequested {
                ticket: self.machine.jump_to_chapter(chapter_id),
            }),
            PlayerCommand::RetryLoad => self
                .machine
                .retry_load()
                .map(|ticket| EngineSignal::ChapterRequested { ticket }),
            PlayerCommand::DecideAudio { accept } => {
                if self.audio.decide(accept) {
                    info!(consent = ?self.audio.consent(), "audio consent recorded");
                }
                None
            }
        };
        if let Some(signal) = &signal {
            self.react(signal);
        }
        signal
    }

    /// Applies any chapter loads that have already finished and reaps
    /// completed progress writes. Never blocks.
    pub fn pump(&mut self) {
        while let Ok((ticket, result)) = self.loads_rx.try_recv() {
            self.apply_load(ticket, result);
        }
        while self.sync_tasks.try_join_next().is_some() {}
    }

    /// Waits until the outstanding chapter load, if any, has been applied.
    pub async fn settle(&mut self) {
        while self.in_flight.is_some() {
            let Some((ticket, result)) = self.loads_rx.recv().await else {
                break;
            };
            self.apply_load(ticket, result);
        }
    }

    /// Waits for every pending progress write to finish.
    pub async fn flush_progress(&mut self) {
        while self.sync_tasks.join_next().await.is_some() {}
    }

    fn react(&mut self, signal: &EngineSignal) {
        debug!(signal = signal.event_type(), "engine signal");
        match signal {
            EngineSignal::ChapterRequested { ticket } => self.spawn_load(*ticket),
            EngineSignal::ChapterCompleted { chapter_id } => {
                self.typewriter.skip();
                self.sync_completion(*chapter_id);
            }
            EngineSignal::DialogAdvanced { .. }
            | EngineSignal::EventEntered { .. }
            | EngineSignal::ChapterStarted { .. } => self.reveal_current_dialog(),
            EngineSignal::ReturnedToMenu | EngineSignal::StoryFinished => self.typewriter.clear(),
            EngineSignal::MinigameResolved { .. } => {}
        }
    }

    fn reveal_current_dialog(&mut self) {
        match self.machine.current_dialog() {
            Some(dialog) => {
                let text = dialog.text.clone();
                self.typewriter.start(text);
            }
            None => self.typewriter.clear(),
        }
    }

    fn spawn_load(&mut self, ticket: LoadTicket) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.typewriter.clear();

        let store = Arc::clone(&self.store);
        let tx = self.loads_tx.clone();
        let handle = tokio::spawn(async move {
            let result = store.load(ticket.chapter_id).await;
            // The receiver is gone once the player is torn down.
            let _ = tx.send((ticket, result));
        });
        self.in_flight = Some(handle.abort_handle());
    }

    fn apply_load(&mut self, ticket: LoadTicket, result: Result<Arc<Chapter>, DomainError>) {
        if self.machine.complete_load(ticket, result) {
            self.in_flight = None;
        }
    }

    fn sync_completion(&mut self, chapter_id: ChapterId) {
        let command = RecordCompletion {
            player_id: self.progress.player_id,
            chapter_id,
        };
        let repository = Arc::clone(&self.progress.repository);
        let clock = Arc::clone(&self.progress.clock);
        self.sync_tasks.spawn(async move {
            match handle_record_completion(&command, clock.as_ref(), repository.as_ref()).await {
                Ok(receipt) => info!(message = %receipt.message, "progress synchronised"),
                Err(e) => warn!(chapter_id = %chapter_id, error = %e, "progress sync failed"),
            }
        });
    }
}

impl Drop for StoryPlayer {
    fn drop(&mut self) {
        if let Some(load) = self.in_flight.take() {
            load.abort();
        }
        // Progress writes are best-effort and outlive the session.
        self.sync_tasks.detach_all();
    }
}
