//! EventBus - broadcast-based observation channel for coordinator events.
//!
//! Agent lifecycle transitions and dispatch progress are published here so
//! that a UI, a logger, or a test can follow what the coordinator is doing.

/// Core event bus implementation (broadcast channel).
pub mod bus;
/// Event type definitions.
pub mod types;

pub use bus::EventBus;
pub use types::CoordinatorEvent;

#[cfg(test)]
mod tests;
