//! Agent Registry
//!
//! Owns every registered agent, drives its start/stop lifecycle, and watches
//! its state stream.
//!
//! The agent map sits behind a single `RwLock`: `register`/`unregister` take
//! the write side, lookups take the read side and hand out `Arc` snapshots so
//! the lock is never held while an agent is running. A separate lifecycle
//! mutex serializes registrations, which may await `start`/`stop`.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::agent::{Agent, AgentInput, AgentState, Capability, InputSource};
use crate::event_bus::{CoordinatorEvent, EventBus};
use crate::matcher;

struct Registration {
    agent: Arc<dyn Agent>,
    /// Registration order, used to break priority ties
    seq: u64,
    /// Stops this registration's state watcher
    watcher: CancellationToken,
}

#[derive(Default)]
struct RegistryInner {
    agents: HashMap<String, Registration>,
    next_seq: u64,
}

/// Registry of agents keyed by name
pub struct AgentRegistry {
    inner: RwLock<RegistryInner>,
    /// Last state each agent pushed
    states: Arc<DashMap<String, AgentState>>,
    events: EventBus,
    /// Serializes register/unregister/shutdown so a name is never mid-swap
    lifecycle: Mutex<()>,
    /// Parent of every watcher token
    shutdown: CancellationToken,
}

impl AgentRegistry {
    /// Create an empty registry publishing on `events`
    #[must_use]
    pub fn new(events: EventBus) -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
            states: Arc::new(DashMap::new()),
            events,
            lifecycle: Mutex::new(()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Event bus this registry publishes on
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Register an agent, start it, then start its dependencies.
    ///
    /// An agent already registered under the same name is taken out of the
    /// registry and fully stopped before the new one is stored.
    pub async fn register(&self, agent: Arc<dyn Agent>) {
        let name = agent.name().to_string();
        let _lifecycle = self.lifecycle.lock().await;

        let previous = self.inner.write().await.agents.remove(&name);
        if let Some(previous) = previous {
            warn!(agent = %name, "Agent already registered, stopping previous instance");
            self.retire(&name, previous).await;
        }

        let watcher = self.shutdown.child_token();
        self.spawn_watcher(name.clone(), agent.state_stream(), watcher.clone());

        {
            let mut inner = self.inner.write().await;
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.agents.insert(
                name.clone(),
                Registration {
                    agent: Arc::clone(&agent),
                    seq,
                    watcher,
                },
            );
        }

        info!(
            agent = %name,
            capabilities = ?agent.capabilities(),
            priority = agent.priority(),
            local = agent.is_local(),
            version = %agent.version(),
            "Registering agent"
        );
        self.events
            .publish(CoordinatorEvent::AgentRegistered { agent: name.clone() });

        self.start_agent(agent.as_ref()).await;
        self.start_dependencies(agent.as_ref()).await;

        debug!(agent = %name, "Registered agent");
    }

    /// Stop and remove an agent. Returns `false` if no agent has that name.
    pub async fn unregister(&self, name: &str) -> bool {
        let _lifecycle = self.lifecycle.lock().await;

        let removed = self.inner.write().await.agents.remove(name);
        let Some(registration) = removed else {
            warn!(agent = %name, "Cannot unregister agent: not found");
            return false;
        };
        self.retire(name, registration).await;

        info!(agent = %name, "Unregistered agent");
        self.events.publish(CoordinatorEvent::AgentUnregistered {
            agent: name.to_string(),
        });
        true
    }

    /// Agents eligible for an input, highest priority first.
    ///
    /// Ties keep registration order.
    pub async fn candidates(&self, input: &AgentInput) -> Vec<Arc<dyn Agent>> {
        let inner = self.inner.read().await;
        let mut selected: Vec<&Registration> = inner
            .agents
            .values()
            .filter(|registration| {
                let eligible = is_candidate(registration.agent.as_ref(), input);
                debug!(agent = %registration.agent.name(), eligible, "Candidate check");
                eligible
            })
            .collect();

        selected.sort_by(|a, b| {
            b.agent
                .priority()
                .cmp(&a.agent.priority())
                .then(a.seq.cmp(&b.seq))
        });
        selected
            .into_iter()
            .map(|registration| Arc::clone(&registration.agent))
            .collect()
    }

    /// Look up an agent by name
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.inner
            .read()
            .await
            .agents
            .get(name)
            .map(|registration| Arc::clone(&registration.agent))
    }

    /// Registered names in registration order
    pub async fn names(&self) -> Vec<String> {
        self.ordered()
            .await
            .iter()
            .map(|agent| agent.name().to_string())
            .collect()
    }

    /// Agents advertising `AdjustableTone`, in registration order
    pub async fn adjustable_agents(&self) -> Vec<Arc<dyn Agent>> {
        self.ordered()
            .await
            .into_iter()
            .filter(|agent| agent.has_capability(Capability::AdjustableTone))
            .collect()
    }

    /// Number of registered agents
    pub async fn len(&self) -> usize {
        self.inner.read().await.agents.len()
    }

    /// Whether no agent is registered
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.agents.is_empty()
    }

    /// Last state pushed by an agent, if it has pushed one
    #[must_use]
    pub fn observed_state(&self, name: &str) -> Option<AgentState> {
        self.states.get(name).map(|state| *state)
    }

    /// Stop every agent and clear the registry
    pub async fn shutdown(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let drained: Vec<(String, Registration)> =
            self.inner.write().await.agents.drain().collect();

        for (name, registration) in drained {
            self.retire(&name, registration).await;
            self.events
                .publish(CoordinatorEvent::AgentUnregistered { agent: name });
        }
        info!("Agent registry shut down");
    }

    /// Cancel the watcher, forget the observed state, then stop the agent.
    /// The registration must already be out of the map.
    async fn retire(&self, name: &str, registration: Registration) {
        // Cancel before clearing the state: a watcher checks its token under
        // the same map entry lock before writing
        registration.watcher.cancel();
        self.states.remove(name);
        registration.agent.stop().await;
    }

    async fn ordered(&self) -> Vec<Arc<dyn Agent>> {
        let inner = self.inner.read().await;
        let mut registrations: Vec<&Registration> = inner.agents.values().collect();
        registrations.sort_by_key(|registration| registration.seq);
        registrations
            .into_iter()
            .map(|registration| Arc::clone(&registration.agent))
            .collect()
    }

    async fn start_agent(&self, agent: &dyn Agent) {
        if !agent.is_available() {
            info!(agent = %agent.name(), "Agent is not available, skipping start");
            return;
        }
        debug!(agent = %agent.name(), "Starting agent");
        agent.start().await;
    }

    async fn start_dependencies(&self, agent: &dyn Agent) {
        for dependency_name in agent.dependencies() {
            let Some(dependency) = self.get(&dependency_name).await else {
                warn!(
                    agent = %agent.name(),
                    dependency = %dependency_name,
                    "Dependency not found"
                );
                continue;
            };

            if !dependency.is_available() {
                info!(dependency = %dependency_name, "Dependency is not available");
                continue;
            }

            debug!(
                agent = %agent.name(),
                dependency = %dependency_name,
                "Starting dependency"
            );
            dependency.start().await;
        }
    }

    fn spawn_watcher(
        &self,
        name: String,
        mut stream: broadcast::Receiver<AgentState>,
        token: CancellationToken,
    ) {
        let states = Arc::clone(&self.states);
        let events = self.events.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    received = stream.recv() => match received {
                        Ok(state) => {
                            {
                                let entry = states.entry(name.clone());
                                if token.is_cancelled() {
                                    break;
                                }
                                entry.insert(state);
                            }
                            match state {
                                AgentState::Ready => info!(agent = %name, "Agent is ready"),
                                AgentState::Busy => debug!(agent = %name, "Agent is busy"),
                                AgentState::Failed => warn!(agent = %name, "Agent has failed"),
                            }
                            events.publish(CoordinatorEvent::AgentStateChanged {
                                agent: name.clone(),
                                state,
                            });
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(agent = %name, skipped, "State watcher lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            debug!(agent = %name, "State watcher stopped");
        });
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new(EventBus::default())
    }
}

impl Drop for AgentRegistry {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn is_candidate(agent: &dyn Agent, input: &AgentInput) -> bool {
    if !agent.is_available() {
        return false;
    }
    match input.source {
        InputSource::Text => {
            (agent.has_capability(Capability::ProcessesText)
                || agent.has_capability(Capability::ProcessesAudio))
                && input
                    .command()
                    .is_some_and(|command| matcher::supports(command, agent.supported_commands()))
        }
        InputSource::Audio => agent.has_capability(Capability::ProcessesAudio),
        InputSource::Ui => true,
    }
}
