//! Jeeves Core - Agent Coordination Engine
//!
//! This crate routes a single user input (text, audio, or UI event) to the
//! registered agents and returns one response:
//! - Agent: the contract every handler implements
//! - Matcher: command pattern matching
//! - Registry: agent lifecycle, state observation, candidate selection
//! - Coordinator: priority-ordered dispatch with per-agent timeouts, the
//!   post-response action pipeline, and personality broadcast
//! - Store: session context persistence
//! - EventBus: observation channel for registry and dispatch events

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod event_bus;
pub mod matcher;
pub mod registry;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use agent::{
    Agent, AgentAction, AgentConfiguration, AgentError, AgentInput, AgentResponse, AgentState,
    Capability, CoachPersonality, CommandPattern, InputSource, Tone, Verdict, NO_AGENT_CODE,
};
pub use context::{AgentContext, ColdContext, ContextKey, CycleSummary, HotContext, TaskItem, WarmContext};
pub use coordinator::{
    ActionProcessor, ConfigureOutcome, ConfigureReport, Coordinator, CoordinatorConfig,
    DispatchOutcome, TimeoutPolicy,
};
pub use error::{Error, Result, StorageError};
pub use event_bus::{CoordinatorEvent, EventBus};
pub use registry::AgentRegistry;
pub use store::{JsonFileStore, MemoryStore, SessionStore, StorageResult};
