//! Novella — Chapter Content bounded context.
//!
//! Responsible for loading chapter documents by id, validating them against
//! the chapter schema, and caching validated chapters per session.

pub mod application;
pub mod domain;
pub mod source;
