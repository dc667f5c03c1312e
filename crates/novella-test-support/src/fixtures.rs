//! Chapter document fixtures.

use serde_json::{Value, json};

fn event(scenario: usize, event: usize, dialogs: usize) -> Value {
    let dialogs: Vec<Value> = (0..dialogs)
        .map(|d| json!({ "text": format!("s{scenario}e{event}d{d}"), "speaker": "Narrator" }))
        .collect();
    json!({ "title": format!("Event {scenario}.{event}"), "dialogs": dialogs })
}

/// Builds a chapter JSON document from a layout: one slice per scenario,
/// one entry per event giving its dialog count. Dialog text is
/// `s{scenario}e{event}d{dialog}`.
#[must_use]
pub fn chapter_json(layout: &[&[usize]]) -> String {
    chapter_json_with_minigame(layout, &[])
}

/// Like [`chapter_json`], attaching a minigame of the given kind to each
/// `(scenario, event)` listed in `minigames`.
#[must_use]
pub fn chapter_json_with_minigame(layout: &[&[usize]], minigames: &[(usize, usize, &str)]) -> String {
    let scenarios: Vec<Value> = layout
        .iter()
        .enumerate()
        .map(|(s, events)| {
            let events: Vec<Value> = events
                .iter()
                .enumerate()
                .map(|(e, &dialogs)| {
                    let mut value = event(s, e, dialogs);
                    if let Some((_, _, kind)) =
                        minigames.iter().find(|(ms, me, _)| *ms == s && *me == e)
                    {
                        value["minigame"] = json!({
                            "kind": kind,
                            "on_success": format!("{kind}-won"),
                            "on_failure": format!("{kind}-lost"),
                        });
                    }
                    value
                })
                .collect();
            json!({ "events": events })
        })
        .collect();
    json!({ "scenarios": scenarios }).to_string()
}
