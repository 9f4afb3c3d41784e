//! Agent Coordinator
//!
//! Routes a single input to the registered agents and returns one response.
//!
//! - Candidates come from the [`AgentRegistry`], highest priority first
//! - Each candidate races its handler against the agent timeout
//! - Success and non-retryable failures finalize; retryable failures fall through
//! - The chosen response's actions mutate the session context, which is then saved

use std::sync::Arc;

use tracing::info;

mod actions;
mod config;
mod dispatch;
mod personality;

pub use actions::ActionProcessor;
pub use config::{CoordinatorConfig, TimeoutPolicy};
pub use dispatch::DispatchOutcome;
pub use personality::{ConfigureOutcome, ConfigureReport};

use crate::agent::Agent;
use crate::context::AgentContext;
use crate::error::Result;
use crate::event_bus::{CoordinatorEvent, EventBus};
use crate::registry::AgentRegistry;
use crate::store::SessionStore;
use tokio::sync::broadcast;

/// Agent coordinator
pub struct Coordinator {
    registry: Arc<AgentRegistry>,
    actions: ActionProcessor,
    store: Arc<dyn SessionStore>,
    events: EventBus,
    config: CoordinatorConfig,
}

impl Coordinator {
    /// Create a coordinator with an empty registry
    pub fn new(config: CoordinatorConfig, store: Arc<dyn SessionStore>) -> Self {
        let events = EventBus::new(config.event_capacity);
        let registry = Arc::new(AgentRegistry::new(events.clone()));
        let actions = ActionProcessor::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            config.agent_timeout(),
            config.max_trigger_depth,
        );

        info!(
            agent_timeout_ms = config.agent_timeout_ms,
            timeout_policy = ?config.timeout_policy,
            "Coordinator initialized"
        );

        Self {
            registry,
            actions,
            store,
            events,
            config,
        }
    }

    /// Agent registry
    #[must_use]
    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Subscribe to registry and dispatch events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    /// Register an agent
    pub async fn register(&self, agent: Arc<dyn Agent>) {
        self.registry.register(agent).await;
    }

    /// Unregister an agent by name
    pub async fn unregister(&self, name: &str) -> bool {
        self.registry.unregister(name).await
    }

    /// Load the session context from the store
    pub async fn load_context(&self) -> Result<AgentContext> {
        Ok(self.store.load().await?)
    }

    /// Stop every registered agent
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
    }
}
