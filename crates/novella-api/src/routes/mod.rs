//! Route modules organized by bounded context.

pub mod content;
pub mod health;
pub mod progress;
pub mod sessions;
