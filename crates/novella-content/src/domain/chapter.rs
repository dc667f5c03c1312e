//! Chapter content model: chapter → scenario → event → dialog.

use novella_core::error::DomainError;
use novella_core::ids::ChapterId;
use serde::{Deserialize, Serialize};

/// A single line of dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    /// Display text revealed by the typewriter.
    pub text: String,
    /// Who is speaking, if anyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

/// Minigame attached to an event. Narrative advancement pauses on entry
/// until the outcome is reported back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinigameDescriptor {
    /// Which minigame to launch.
    pub kind: String,
    /// Opaque target handed back to the host on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_success: Option<String>,
    /// Opaque target handed back to the host on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<String>,
    /// Any further per-minigame configuration.
    #[serde(flatten)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

/// A titled run of dialogs, optionally gated by a minigame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event title.
    pub title: String,
    /// Ordered dialogs.
    pub dialogs: Vec<Dialog>,
    /// Minigame played when the event is entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minigame: Option<MinigameDescriptor>,
}

/// An ordered sequence of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Ordered events.
    pub events: Vec<Event>,
}

/// The document shape of `chapter{id}.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterDocument {
    /// Ordered scenarios.
    pub scenarios: Vec<Scenario>,
}

/// A validated, immutable chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    /// Chapter number.
    pub id: ChapterId,
    /// SHA-256 of the raw document, hex encoded.
    pub content_hash: String,
    /// Ordered scenarios; never empty.
    pub scenarios: Vec<Scenario>,
}

impl Chapter {
    /// Builds a chapter from a parsed document, enforcing that every level of
    /// the hierarchy is non-empty so any zeroed position is addressable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedContent` naming the first empty list or
    /// blank minigame kind found.
    pub fn from_document(
        id: ChapterId,
        content_hash: String,
        document: ChapterDocument,
    ) -> Result<Self, DomainError> {
        let malformed = |reason: String| DomainError::MalformedContent {
            chapter_id: id,
            reason,
        };

        if document.scenarios.is_empty() {
            return Err(malformed("scenarios is empty".to_owned()));
        }
        for (s, scenario) in document.scenarios.iter().enumerate() {
            if scenario.events.is_empty() {
                return Err(malformed(format!("scenarios[{s}].events is empty")));
            }
            for (e, event) in scenario.events.iter().enumerate() {
                if event.dialogs.is_empty() {
                    return Err(malformed(format!(
                        "scenarios[{s}].events[{e}].dialogs is empty"
                    )));
                }
                if let Some(minigame) = &event.minigame
                    && minigame.kind.trim().is_empty()
                {
                    return Err(malformed(format!(
                        "scenarios[{s}].events[{e}].minigame.kind is blank"
                    )));
                }
            }
        }

        Ok(Self {
            id,
            content_hash,
            scenarios: document.scenarios,
        })
    }

    /// Total number of dialogs across the chapter.
    #[must_use]
    pub fn dialog_count(&self) -> usize {
        self.scenarios
            .iter()
            .flat_map(|s| &s.events)
            .map(|e| e.dialogs.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog(text: &str) -> Dialog {
        Dialog {
            text: text.to_owned(),
            speaker: None,
        }
    }

    fn event(dialogs: Vec<Dialog>) -> Event {
        Event {
            title: "Arrival".to_owned(),
            dialogs,
            minigame: None,
        }
    }

    #[test]
    fn test_from_document_accepts_well_formed_chapter() {
        // Arrange
        let document = ChapterDocument {
            scenarios: vec![Scenario {
                events: vec![event(vec![dialog("a"), dialog("b")])],
            }],
        };

        // Act
        let chapter = Chapter::from_document(ChapterId::FIRST, "h".to_owned(), document).unwrap();

        // Assert
        assert_eq!(chapter.id, ChapterId::FIRST);
        assert_eq!(chapter.dialog_count(), 2);
    }

    #[test]
    fn test_from_document_rejects_empty_scenarios() {
        let document = ChapterDocument { scenarios: vec![] };

        let result = Chapter::from_document(ChapterId::FIRST, String::new(), document);

        match result.unwrap_err() {
            DomainError::MalformedContent { reason, .. } => assert_eq!(reason, "scenarios is empty"),
            other => panic!("expected MalformedContent, got {other:?}"),
        }
    }

    #[test]
    fn test_from_document_names_the_empty_dialog_list() {
        let document = ChapterDocument {
            scenarios: vec![Scenario {
                events: vec![event(vec![dialog("a")]), event(vec![])],
            }],
        };

        let result = Chapter::from_document(ChapterId::FIRST, String::new(), document);

        match result.unwrap_err() {
            DomainError::MalformedContent { reason, .. } => {
                assert_eq!(reason, "scenarios[0].events[1].dialogs is empty");
            }
            other => panic!("expected MalformedContent, got {other:?}"),
        }
    }

    #[test]
    fn test_from_document_rejects_blank_minigame_kind() {
        let mut gated = event(vec![dialog("a")]);
        gated.minigame = Some(MinigameDescriptor {
            kind: "  ".to_owned(),
            on_success: None,
            on_failure: None,
            config: serde_json::Map::new(),
        });
        let document = ChapterDocument {
            scenarios: vec![Scenario {
                events: vec![gated],
            }],
        };

        let result = Chapter::from_document(ChapterId::FIRST, String::new(), document);

        assert!(matches!(
            result,
            Err(DomainError::MalformedContent { .. })
        ));
    }
}
