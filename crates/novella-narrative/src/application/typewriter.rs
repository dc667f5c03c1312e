//! Timed character-by-character reveal of dialog text.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delay between revealed characters.
pub const DEFAULT_CHAR_INTERVAL: Duration = Duration::from_millis(50);

/// Progress of the current reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reveal {
    /// Bumped by every `start`; ticks from older texts are discarded.
    pub generation: u64,
    /// Characters revealed so far. Never decreases within a generation.
    pub revealed: usize,
    /// Characters in the text.
    pub total: usize,
}

impl Reveal {
    /// Whether the whole text is visible.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }
}

/// Reveals one character per interval on a background timer task. The timer
/// is aborted by `skip`, by the next `start`, and on drop.
#[derive(Debug)]
pub struct TypewriterSequencer {
    interval: Duration,
    text: String,
    reveal: Arc<watch::Sender<Reveal>>,
    timer: Option<JoinHandle<()>>,
}

impl TypewriterSequencer {
    /// Creates an idle sequencer with nothing to reveal.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let (reveal, _) = watch::channel(Reveal::default());
        Self {
            interval,
            text: String::new(),
            reveal: Arc::new(reveal),
            timer: None,
        }
    }

    /// Starts revealing `text`, cancelling any reveal in flight.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&mut self, text: impl Into<String>) {
        self.cancel();
        self.text = text.into();
        let total = self.text.chars().count();
        let generation = self.reveal.borrow().generation + 1;
        self.reveal.send_replace(Reveal {
            generation,
            revealed: 0,
            total,
        });
        if total == 0 {
            return;
        }

        let reveal = Arc::clone(&self.reveal);
        let interval = self.interval;
        self.timer = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let mut done = false;
                reveal.send_if_modified(|r| {
                    if r.generation != generation || r.is_complete() {
                        done = true;
                        return false;
                    }
                    r.revealed += 1;
                    done = r.is_complete();
                    true
                });
                if done {
                    break;
                }
            }
        }));
    }

    /// Completes the current reveal immediately.
    pub fn skip(&mut self) {
        self.cancel();
        self.reveal.send_if_modified(|r| {
            if r.is_complete() {
                return false;
            }
            r.revealed = r.total;
            true
        });
    }

    /// Stops revealing and clears the text.
    pub fn clear(&mut self) {
        self.start(String::new());
    }

    /// Whether the whole text is visible.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.reveal.borrow().is_complete()
    }

    /// The full text being revealed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The visible prefix of the text.
    #[must_use]
    pub fn revealed_text(&self) -> &str {
        let revealed = self.reveal.borrow().revealed;
        match self.text.char_indices().nth(revealed) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    /// Watch reveal progress, e.g. to redraw on every tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Reveal> {
        self.reveal.subscribe()
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Default for TypewriterSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_INTERVAL)
    }
}

impl Drop for TypewriterSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}
