//! Application layer for the Player Progress context.

pub mod command_handlers;
pub mod query_handlers;
