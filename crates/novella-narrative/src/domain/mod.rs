//! Domain layer for the Narrative Engine context.

pub mod audio;
pub mod commands;
pub mod engine;
pub mod events;
pub mod minigame;
pub mod overlay;
pub mod position;
pub mod state;
