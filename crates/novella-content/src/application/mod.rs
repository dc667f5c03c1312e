//! Application layer for the Chapter Content context.

pub mod chapter_store;
