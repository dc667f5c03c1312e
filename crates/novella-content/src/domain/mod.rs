//! Domain layer for the Chapter Content context.

pub mod chapter;
pub mod parse;
