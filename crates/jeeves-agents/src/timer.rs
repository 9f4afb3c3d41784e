//! Timer agent
//!
//! Handles the focus-session basics: timers, mute, deep focus, session
//! summaries, and forwarding a command to another agent.
//!
//! Commands are normalized before matching (trimmed, lowercased, whitespace
//! collapsed to `_`), so `start timer` and `start_timer` are the same command.
//! Trigger targets keep their original case since agent names are exact keys.

use async_trait::async_trait;
use jeeves_core::{
    Agent, AgentAction, AgentConfiguration, AgentContext, AgentError, AgentInput, AgentResponse,
    AgentState, Capability, CommandPattern, InputSource,
};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

static CAPABILITIES: [Capability; 2] = [Capability::ProcessesText, Capability::AdjustableTone];

/// Built-in timer / focus agent
pub struct TimerAgent {
    name: String,
    priority: i32,
    commands: Vec<CommandPattern>,
    state_tx: broadcast::Sender<AgentState>,
    config: RwLock<Option<AgentConfiguration>>,
}

impl TimerAgent {
    /// Agent registered as `timer` with priority 1
    #[must_use]
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(16);
        Self {
            name: "timer".to_string(),
            priority: 1,
            commands: default_commands(),
            state_tx,
            config: RwLock::new(None),
        }
    }

    /// Register under a different name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the priority
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Last configuration pushed by the coordinator
    pub async fn configuration(&self) -> Option<AgentConfiguration> {
        self.config.read().await.clone()
    }

    fn emit(&self, state: AgentState) {
        // No subscribers is fine
        let _ = self.state_tx.send(state);
    }

    fn respond(&self, raw: &str, context: &AgentContext) -> AgentResponse {
        let typed = compact(raw);
        let command = typed.to_lowercase();
        match command.as_str() {
            "start_timer" => AgentResponse::success("Timer started"),
            "stop_timer" => {
                let cycle = context.summarize_cycle();
                AgentResponse::success("Timer stopped")
                    .with_metadata("completed_tasks", cycle.completed_tasks.len().to_string())
                    .with_metadata("cycle", cycle.notes)
            }
            "pause_timer" => AgentResponse::success("Timer paused"),
            "resume_timer" => AgentResponse::success("Timer resumed"),
            "mute" => AgentResponse::success("Muted").with_action(set_flag("muted", true)),
            "unmute" => AgentResponse::success("Unmuted").with_action(set_flag("muted", false)),
            "deep_focus_true" => AgentResponse::success("Deep focus enabled")
                .with_action(set_flag("deepFocus", true)),
            "deep_focus_false" => AgentResponse::success("Deep focus disabled")
                .with_action(set_flag("deepFocus", false)),
            "summarize_session" => {
                let summary = context.warm.summaries.join("\n");
                if summary.is_empty() {
                    AgentResponse::success("No summaries available")
                } else {
                    AgentResponse::success(format!("Session Summary:\n{}", summary))
                }
            }
            other => {
                if let Some(rest) = other.strip_prefix("start_timer_") {
                    return match rest.split('_').next().and_then(|m| m.parse::<u32>().ok()) {
                        Some(minutes) => AgentResponse::success(format!(
                            "Timer started for {} minutes",
                            minutes
                        ))
                        .with_metadata("duration_minutes", minutes.to_string()),
                        None => AgentResponse::failure("Invalid duration", None),
                    };
                }
                if other.starts_with("trigger_") {
                    // Registry keys are case-sensitive: forward the target as typed
                    let rest = typed.get("trigger_".len()..).unwrap_or_default();
                    return match rest.split_once('_') {
                        Some((agent_name, forwarded)) if !agent_name.is_empty() && !forwarded.is_empty() => {
                            AgentResponse::success(format!(
                                "Triggering {} with {}",
                                agent_name, forwarded
                            ))
                            .with_action(AgentAction::TriggerAgent {
                                agent_name: agent_name.to_string(),
                                command: forwarded.to_string(),
                            })
                        }
                        _ => AgentResponse::failure("Invalid trigger command", None),
                    };
                }
                AgentResponse::failure(format!("Unrecognized command: {}", raw), None)
            }
        }
    }
}

impl Default for TimerAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for TimerAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &[Capability] {
        &CAPABILITIES
    }

    fn supported_commands(&self) -> &[CommandPattern] {
        &self.commands
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_available(&self) -> bool {
        true
    }

    fn state_stream(&self) -> broadcast::Receiver<AgentState> {
        self.state_tx.subscribe()
    }

    async fn handle(&self, input: &AgentInput, context: &AgentContext) -> AgentResponse {
        if input.source != InputSource::Text {
            return AgentResponse::failure("Unsupported input type", None);
        }

        self.emit(AgentState::Busy);
        let response = self.respond(&input.data, context);
        self.emit(AgentState::Ready);

        debug!(
            agent = %self.name,
            command = %input.data,
            success = response.success,
            "Handled command"
        );
        response
    }

    async fn start(&self) {
        self.emit(AgentState::Ready);
    }

    async fn stop(&self) {
        self.emit(AgentState::Failed);
    }

    async fn configure(&self, config: &AgentConfiguration) -> Result<(), AgentError> {
        info!(agent = %self.name, tone = ?config.tone, "Applying personality");
        *self.config.write().await = Some(config.clone());
        Ok(())
    }
}

fn default_commands() -> Vec<CommandPattern> {
    vec![
        CommandPattern::verb_noun("start", "timer"),
        CommandPattern::verb_noun("stop", "timer"),
        CommandPattern::verb_noun("pause", "timer"),
        CommandPattern::verb_noun("resume", "timer"),
        CommandPattern::verb("mute"),
        CommandPattern::verb("unmute"),
        CommandPattern::verb_noun("deep", "focus"),
        CommandPattern::verb_noun("summarize", "session"),
        CommandPattern::wildcard("start"),
        CommandPattern::wildcard("trigger"),
    ]
}

fn set_flag(key: &str, value: bool) -> AgentAction {
    AgentAction::UpdateContext {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Collapse whitespace runs to `_`, preserving case
fn compact(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests;
