//! Domain event abstractions.

/// Trait for signals emitted by engine transitions.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name, e.g. `narrative.chapter_completed`.
    fn event_type(&self) -> &'static str;
}
