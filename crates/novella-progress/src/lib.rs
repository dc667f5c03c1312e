//! Novella — Player Progress bounded context.
//!
//! Responsible for the per-player chapter unlock/completion watermark:
//! reading it with a safe default and advancing it monotonically when a
//! chapter is completed.

pub mod application;
pub mod domain;
pub mod in_memory;
