use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::agent::{AgentAction, AgentInput};
use crate::context::AgentContext;
use crate::registry::AgentRegistry;
use crate::store::SessionStore;

/// Executes the actions attached to a chosen response.
///
/// `UpdateContext` actions are applied to the context in list order.
/// `TriggerAgent` actions run concurrently, each against the context as it
/// stood when the action was reached, and their responses are discarded.
pub struct ActionProcessor {
    registry: Arc<AgentRegistry>,
    store: Arc<dyn SessionStore>,
    agent_timeout: Duration,
    max_trigger_depth: u32,
}

impl ActionProcessor {
    /// Create a processor
    pub fn new(
        registry: Arc<AgentRegistry>,
        store: Arc<dyn SessionStore>,
        agent_timeout: Duration,
        max_trigger_depth: u32,
    ) -> Self {
        Self {
            registry,
            store,
            agent_timeout,
            max_trigger_depth,
        }
    }

    /// Apply `actions` and save the result exactly once.
    ///
    /// A failed save is logged; the updated context is returned either way.
    pub async fn process(
        &self,
        actions: &[AgentAction],
        context: AgentContext,
        depth: u32,
    ) -> AgentContext {
        let updated = self.apply(actions, context, depth).await;

        if let Err(e) = self.store.save(&updated).await {
            warn!(
                session_id = %updated.cold.session_id,
                error = %e,
                "Failed to save context"
            );
        }
        updated
    }

    /// Apply `actions` without persisting. Waits for every trigger to finish.
    ///
    /// `depth` is the trigger depth of the input that produced the actions.
    pub async fn apply(
        &self,
        actions: &[AgentAction],
        context: AgentContext,
        depth: u32,
    ) -> AgentContext {
        let mut updated = context;
        let mut triggers = Vec::new();

        for action in actions {
            match action {
                AgentAction::UpdateContext { key, value } => {
                    if updated.apply_update(key, value) {
                        debug!(key = %key, value = %value, "Updated context");
                    } else {
                        debug!(key = %key, value = %value, "Ignored context update");
                    }
                }
                AgentAction::TriggerAgent {
                    agent_name,
                    command,
                } => {
                    triggers.push(self.trigger(agent_name, command, updated.clone(), depth));
                }
            }
        }

        join_all(triggers).await;
        updated
    }

    async fn trigger(&self, agent_name: &str, command: &str, context: AgentContext, depth: u32) {
        let next_depth = depth.saturating_add(1);
        if next_depth > self.max_trigger_depth {
            warn!(
                agent = %agent_name,
                depth = next_depth,
                max_depth = self.max_trigger_depth,
                "Trigger depth limit reached, skipping"
            );
            return;
        }

        let Some(agent) = self.registry.get(agent_name).await else {
            warn!(agent = %agent_name, "Trigger target not found, skipping");
            return;
        };
        if !agent.is_available() {
            warn!(agent = %agent_name, "Trigger target not available, skipping");
            return;
        }

        let input = AgentInput::triggered(command, next_depth);
        match tokio::time::timeout(self.agent_timeout, agent.handle(&input, &context)).await {
            Ok(response) => debug!(
                agent = %agent_name,
                command = %command,
                success = response.success,
                "Triggered agent finished"
            ),
            Err(_) => warn!(
                agent = %agent_name,
                command = %command,
                "Triggered agent timed out"
            ),
        }
    }
}
