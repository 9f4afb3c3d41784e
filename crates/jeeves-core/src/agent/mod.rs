//! Agent contract
//!
//! Every handler the coordinator can route to implements [`Agent`]. The
//! registry owns agents as `Arc<dyn Agent>`; the dispatcher only ever calls
//! them through this trait.

mod response;
mod types;

pub use response::{AgentAction, AgentError, AgentResponse, Verdict, NO_AGENT_CODE};
pub use types::{
    AgentConfiguration, AgentInput, AgentState, Capability, CoachPersonality, CommandPattern,
    InputSource, Tone,
};

use crate::context::AgentContext;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// A handler for one category of user command.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique registry key
    fn name(&self) -> &str;

    /// Declared capabilities
    fn capabilities(&self) -> &[Capability];

    /// Check for a single capability
    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Command patterns this agent answers, checked in order
    fn supported_commands(&self) -> &[CommandPattern];

    /// Higher is preferred
    fn priority(&self) -> i32;

    /// Whether the agent runs on-device. Defaults to not needing the network.
    fn is_local(&self) -> bool {
        !self.has_capability(Capability::NeedsNetwork)
    }

    /// Agent version string
    fn version(&self) -> &str {
        "1.0"
    }

    /// Names of agents that must be started alongside this one
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Evaluated on every lookup; must be cheap and side-effect free
    fn is_available(&self) -> bool;

    /// Fresh subscription to this agent's state transitions
    fn state_stream(&self) -> broadcast::Receiver<AgentState>;

    /// Answer an input. Called at most once per dispatch attempt.
    async fn handle(&self, input: &AgentInput, context: &AgentContext) -> AgentResponse;

    /// Bring the agent up
    async fn start(&self);

    /// Shut the agent down
    async fn stop(&self);

    /// Apply a personality configuration
    async fn configure(&self, config: &AgentConfiguration) -> Result<(), AgentError>;
}

#[cfg(test)]
mod tests;
