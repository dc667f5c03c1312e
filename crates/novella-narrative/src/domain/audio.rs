//! One-time audio consent.

use serde::Serialize;
use tracing::debug;

/// The player's answer to the audio prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioConsent {
    /// No answer yet; sound stays off.
    #[default]
    Undecided,
    /// Sound effects may be wired in.
    Accepted,
    /// Sound stays off for the session.
    Declined,
}

/// Records the first audio decision of a session and ignores later ones.
/// Independent of narrative state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioConsentGate {
    consent: AudioConsent,
}

impl AudioConsentGate {
    /// Create an undecided gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the player's decision. Returns `false` if a decision was
    /// already made, in which case nothing changes.
    pub fn decide(&mut self, accept: bool) -> bool {
        if self.consent != AudioConsent::Undecided {
            debug!(consent = ?self.consent, "audio consent already decided");
            return false;
        }
        self.consent = if accept {
            AudioConsent::Accepted
        } else {
            AudioConsent::Declined
        };
        true
    }

    /// The current decision.
    #[must_use]
    pub fn consent(&self) -> AudioConsent {
        self.consent
    }

    /// Whether sound effects should be active.
    #[must_use]
    pub fn sound_enabled(&self) -> bool {
        self.consent == AudioConsent::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_is_off_until_accepted() {
        let mut gate = AudioConsentGate::new();
        assert!(!gate.sound_enabled());

        assert!(gate.decide(true));

        assert!(gate.sound_enabled());
        assert_eq!(gate.consent(), AudioConsent::Accepted);
    }

    #[test]
    fn test_first_decision_sticks() {
        let mut gate = AudioConsentGate::new();
        gate.decide(false);

        let changed = gate.decide(true);

        assert!(!changed);
        assert_eq!(gate.consent(), AudioConsent::Declined);
        assert!(!gate.sound_enabled());
    }
}
