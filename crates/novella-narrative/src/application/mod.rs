//! Application layer for the Narrative Engine context.

pub mod player;
pub mod query_handlers;
pub mod typewriter;
