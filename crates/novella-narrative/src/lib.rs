//! Novella — Narrative Engine bounded context.
//!
//! Owns the chapter → scenario → event → dialog position and every transition
//! over it: advancing dialog, minigame pauses, intro/outro overlays, and the
//! async driver that loads chapters, reveals text and synchronises progress.

pub mod application;
pub mod domain;
