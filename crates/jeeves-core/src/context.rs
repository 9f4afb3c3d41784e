//! Session context
//!
//! Three tiers of session state, by how often they change:
//! - hot: flags flipped by actions (muted, deep focus)
//! - warm: task list and accumulated summaries
//! - cold: stable identity (user, session)
//!
//! A context is a plain value. Each dispatch works on its own copy and the
//! session store keeps the authoritative one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Frequently mutated flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotContext {
    /// Coach output is muted
    pub muted: bool,
    /// Deep focus mode is on
    pub deep_focus: bool,
}

/// A task tracked during the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Task title
    pub title: String,
    /// Whether the task is done
    pub completed: bool,
}

impl TaskItem {
    /// Create a task
    #[must_use]
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self {
            title: title.into(),
            completed,
        }
    }
}

/// Working state accumulated over the session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmContext {
    /// Current tasks
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
    /// Textual summaries of previous cycles
    #[serde(default)]
    pub summaries: Vec<String>,
}

/// Stable identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColdContext {
    /// User identifier
    pub user_id: String,
    /// Session identifier
    pub session_id: String,
}

impl Default for ColdContext {
    fn default() -> Self {
        Self {
            user_id: "mock_user".to_string(),
            session_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Full session context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContext {
    /// Hot tier
    #[serde(default)]
    pub hot: HotContext,
    /// Warm tier
    #[serde(default)]
    pub warm: WarmContext,
    /// Cold tier
    #[serde(default)]
    pub cold: ColdContext,
}

/// Hot-context flag addressable by an `UpdateContext` action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKey {
    /// `muted`
    Muted,
    /// `deepFocus`
    DeepFocus,
}

impl ContextKey {
    /// Parse an action key. Unknown keys yield `None`.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "muted" => Some(Self::Muted),
            "deepFocus" => Some(Self::DeepFocus),
            _ => None,
        }
    }
}

/// Summary of one work cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Tasks finished during the cycle
    pub completed_tasks: Vec<TaskItem>,
    /// Short note, e.g. "Completed 2 tasks"
    pub notes: String,
}

impl AgentContext {
    /// Fresh context for a user
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            cold: ColdContext {
                user_id: user_id.into(),
                ..ColdContext::default()
            },
            ..Self::default()
        }
    }

    /// Apply an `UpdateContext` key/value pair.
    ///
    /// Only `muted` and `deepFocus` are recognized and the value must be the
    /// literal `true` or `false`. Returns whether the context was touched.
    pub fn apply_update(&mut self, key: &str, value: &str) -> bool {
        let (Some(key), Ok(flag)) = (ContextKey::parse(key), value.parse::<bool>()) else {
            return false;
        };
        match key {
            ContextKey::Muted => self.hot.muted = flag,
            ContextKey::DeepFocus => self.hot.deep_focus = flag,
        }
        true
    }

    /// Summarize the completed tasks of the current cycle
    #[must_use]
    pub fn summarize_cycle(&self) -> CycleSummary {
        let completed_tasks: Vec<TaskItem> = self
            .warm
            .tasks
            .iter()
            .filter(|task| task.completed)
            .cloned()
            .collect();
        let notes = format!("Completed {} tasks", completed_tasks.len());
        CycleSummary {
            completed_tasks,
            notes,
        }
    }
}
