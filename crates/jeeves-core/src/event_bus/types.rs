use crate::agent::{AgentState, InputSource};
use serde::Serialize;
use uuid::Uuid;

/// Events emitted by the registry and the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoordinatorEvent {
    /// An agent was added to the registry
    AgentRegistered {
        /// Agent name
        agent: String,
    },
    /// An agent was removed from the registry
    AgentUnregistered {
        /// Agent name
        agent: String,
    },
    /// An agent pushed a state transition
    AgentStateChanged {
        /// Agent name
        agent: String,
        /// New state
        state: AgentState,
    },
    /// Dispatch of an input began
    DispatchStarted {
        /// Dispatch identifier
        dispatch_id: Uuid,
        /// Input source
        source: InputSource,
        /// Number of candidates selected
        candidates: usize,
    },
    /// A candidate did not answer within the timeout
    CandidateTimedOut {
        /// Dispatch identifier
        dispatch_id: Uuid,
        /// Agent name
        agent: String,
    },
    /// A candidate failed retryably and the next one will be tried
    CandidateRejected {
        /// Dispatch identifier
        dispatch_id: Uuid,
        /// Agent name
        agent: String,
    },
    /// Dispatch delivered its final response
    DispatchCompleted {
        /// Dispatch identifier
        dispatch_id: Uuid,
        /// Agent whose response was delivered, if any
        agent: Option<String>,
        /// Whether the delivered response was successful
        success: bool,
    },
}

impl CoordinatorEvent {
    /// Agent the event is about, if any
    #[must_use]
    pub fn agent(&self) -> Option<&str> {
        match self {
            Self::AgentRegistered { agent }
            | Self::AgentUnregistered { agent }
            | Self::AgentStateChanged { agent, .. }
            | Self::CandidateTimedOut { agent, .. }
            | Self::CandidateRejected { agent, .. } => Some(agent),
            Self::DispatchCompleted { agent, .. } => agent.as_deref(),
            Self::DispatchStarted { .. } => None,
        }
    }

    /// Dispatch the event belongs to, if any
    #[must_use]
    pub fn dispatch_id(&self) -> Option<Uuid> {
        match self {
            Self::DispatchStarted { dispatch_id, .. }
            | Self::CandidateTimedOut { dispatch_id, .. }
            | Self::CandidateRejected { dispatch_id, .. }
            | Self::DispatchCompleted { dispatch_id, .. } => Some(*dispatch_id),
            Self::AgentRegistered { .. }
            | Self::AgentUnregistered { .. }
            | Self::AgentStateChanged { .. } => None,
        }
    }
}
