//! PostgreSQL adapter for the hosted identity/progress store.

pub mod pg_progress_repository;
pub mod schema;
