//! Coordinator configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the dispatcher does when a candidate exceeds the agent timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Deliver a timeout response and stop the dispatch
    #[default]
    AbortDispatch,
    /// Drop the slow candidate and try the next one
    SkipCandidate,
}

/// Configuration for the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Budget for a single agent `handle` call, in milliseconds
    #[serde(default = "default_agent_timeout_ms")]
    pub agent_timeout_ms: u64,
    /// Behaviour when a candidate times out
    #[serde(default)]
    pub timeout_policy: TimeoutPolicy,
    /// Run the action list of non-retryable failure responses too
    #[serde(default)]
    pub terminal_failure_actions: bool,
    /// Maximum chain length of `TriggerAgent` hops
    #[serde(default = "default_max_trigger_depth")]
    pub max_trigger_depth: u32,
    /// Budget for a single personality push, in milliseconds
    #[serde(default = "default_configure_timeout_ms")]
    pub configure_timeout_ms: u64,
    /// Event bus buffer size
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_agent_timeout_ms() -> u64 {
    5000
}

fn default_max_trigger_depth() -> u32 {
    3
}

fn default_configure_timeout_ms() -> u64 {
    5000
}

fn default_event_capacity() -> usize {
    256
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            agent_timeout_ms: default_agent_timeout_ms(),
            timeout_policy: TimeoutPolicy::default(),
            terminal_failure_actions: false,
            max_trigger_depth: default_max_trigger_depth(),
            configure_timeout_ms: default_configure_timeout_ms(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl CoordinatorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-agent timeout
    #[must_use]
    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the timeout policy
    #[must_use]
    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    /// Run actions attached to non-retryable failures
    #[must_use]
    pub fn with_terminal_failure_actions(mut self, enabled: bool) -> Self {
        self.terminal_failure_actions = enabled;
        self
    }

    /// Set the trigger chain limit
    #[must_use]
    pub fn with_max_trigger_depth(mut self, depth: u32) -> Self {
        self.max_trigger_depth = depth;
        self
    }

    /// Set the per-agent configuration push timeout
    #[must_use]
    pub fn with_configure_timeout(mut self, timeout: Duration) -> Self {
        self.configure_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Per-agent handle budget
    #[must_use]
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    /// Per-agent configure budget
    #[must_use]
    pub fn configure_timeout(&self) -> Duration {
        Duration::from_millis(self.configure_timeout_ms)
    }

    /// Reject values the coordinator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.agent_timeout_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "agent_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.configure_timeout_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "configure_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.event_capacity == 0 {
            return Err(Error::InvalidConfig {
                field: "event_capacity".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
