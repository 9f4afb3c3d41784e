use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::types::{AgentInput, InputSource};

/// Error code used for the "no agent available" fallback
pub const NO_AGENT_CODE: u16 = 404;

/// Failure reported by an agent. `retryable` decides whether dispatch moves
/// on to the next candidate or stops.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("agent error {code}: {message}")]
pub struct AgentError {
    /// Numeric code
    pub code: u16,
    /// Human readable message
    pub message: String,
    /// Whether a lower-priority candidate may be tried
    pub retryable: bool,
}

impl AgentError {
    /// Failure that lets dispatch fall through to the next candidate
    #[must_use]
    pub fn retryable(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: true,
        }
    }

    /// Failure that ends dispatch
    #[must_use]
    pub fn fatal(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    /// No agent could take the input
    #[must_use]
    pub fn no_agent() -> Self {
        Self::fatal(NO_AGENT_CODE, "No agent available")
    }
}

/// Side effect attached to a response, executed after the response is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentAction {
    /// Set a hot-context flag. Recognized keys: `muted`, `deepFocus`.
    UpdateContext {
        /// Context key
        key: String,
        /// Boolean literal (`true` / `false`)
        value: String,
    },
    /// Invoke another registered agent with a text command
    TriggerAgent {
        /// Registry key of the target agent
        agent_name: String,
        /// Command passed as text input
        command: String,
    },
}

/// How the dispatcher treats a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Successful; finalize
    Accept,
    /// Non-retryable failure; finalize without consulting other candidates
    Terminal,
    /// Failed without error or with a retryable error; try the next candidate
    Retry,
}

/// Answer produced by an agent (or synthesized by the dispatcher).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Text shown to the user
    pub text: String,
    /// Whether the agent handled the input
    pub success: bool,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Failure details
    #[serde(default)]
    pub error: Option<AgentError>,
    /// Actions to run once this response is chosen, in order
    #[serde(default)]
    pub actions: Vec<AgentAction>,
}

impl AgentResponse {
    /// Successful response
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            metadata: HashMap::new(),
            error: None,
            actions: Vec::new(),
        }
    }

    /// Failed response, optionally carrying an error
    #[must_use]
    pub fn failure(text: impl Into<String>, error: Option<AgentError>) -> Self {
        Self {
            text: text.into(),
            success: false,
            metadata: HashMap::new(),
            error,
            actions: Vec::new(),
        }
    }

    /// Synthetic response for an agent that did not answer in time
    #[must_use]
    pub fn timeout(agent_name: &str) -> Self {
        Self::failure("Timeout", None).with_metadata("agent", agent_name)
    }

    /// Response used when no candidate produced a final answer
    #[must_use]
    pub fn fallback(input: &AgentInput) -> Self {
        let text = match input.source {
            InputSource::Text => format!("I don't understand '{}'. Try again.", input.data),
            InputSource::Audio | InputSource::Ui => {
                "I'm not sure how to help with that.".to_string()
            }
        };
        Self::failure(text, Some(AgentError::no_agent())).with_metadata("input", input.data.clone())
    }

    /// Append an action
    #[must_use]
    pub fn with_action(mut self, action: AgentAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Add a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Classify this response for the dispatch policy
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.success {
            return Verdict::Accept;
        }
        match &self.error {
            Some(error) if !error.retryable => Verdict::Terminal,
            _ => Verdict::Retry,
        }
    }

    /// Text with the error message appended, as shown to the user
    #[must_use]
    pub fn display_text(&self) -> String {
        match &self.error {
            Some(error) => format!("{}\nError: {}", self.text, error.message),
            None => self.text.clone(),
        }
    }
}
