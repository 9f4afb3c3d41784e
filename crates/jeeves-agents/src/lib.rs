//! Jeeves Agents
//!
//! Built-in agents that plug into the `jeeves-core` coordinator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod timer;

pub use timer::TimerAgent;
