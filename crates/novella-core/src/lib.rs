//! Novella Core — shared domain abstractions.
//!
//! This crate defines the identifiers, error taxonomy and collaborator traits
//! that every bounded context depends on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod ids;
pub mod repository;
