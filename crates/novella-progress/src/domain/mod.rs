//! Domain layer for the Player Progress context.

pub mod commands;
pub mod watermark;
