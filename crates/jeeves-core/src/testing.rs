//! Scripted agent for tests
//!
//! `ScriptedAgent` answers from a queue of canned responses (falling back to
//! a default one), optionally after a delay, and records every call so tests
//! can assert on who was invoked and with what.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::agent::{
    Agent, AgentConfiguration, AgentError, AgentInput, AgentResponse, AgentState, Capability,
    CommandPattern,
};
use crate::context::AgentContext;

/// A configurable agent that replays queued responses.
pub struct ScriptedAgent {
    name: String,
    capabilities: Vec<Capability>,
    commands: Vec<CommandPattern>,
    priority: i32,
    dependencies: Vec<String>,
    available: AtomicBool,
    delay: Option<Duration>,
    responses: Mutex<VecDeque<AgentResponse>>,
    default_response: AgentResponse,
    configure_result: Result<(), AgentError>,
    configure_delay: Option<Duration>,
    stop_delay: Option<Duration>,
    state_tx: broadcast::Sender<AgentState>,
    inputs: Mutex<Vec<AgentInput>>,
    contexts: Mutex<Vec<AgentContext>>,
    configs: Mutex<Vec<AgentConfiguration>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ScriptedAgent {
    /// Text-capable agent with no command patterns and priority 0
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (state_tx, _) = broadcast::channel(32);
        Self {
            default_response: AgentResponse::success(format!("{} handled", name)),
            name,
            capabilities: vec![Capability::ProcessesText],
            commands: Vec::new(),
            priority: 0,
            dependencies: Vec::new(),
            available: AtomicBool::new(true),
            delay: None,
            responses: Mutex::new(VecDeque::new()),
            configure_result: Ok(()),
            configure_delay: None,
            stop_delay: None,
            state_tx,
            inputs: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
            configs: Mutex::new(Vec::new()),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    /// Set the priority
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the capability set
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl Into<Vec<Capability>>) -> Self {
        self.capabilities = capabilities.into();
        self
    }

    /// Add a command pattern
    #[must_use]
    pub fn with_command(mut self, pattern: CommandPattern) -> Self {
        self.commands.push(pattern);
        self
    }

    /// Add a dependency
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    /// Sleep this long before answering
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Response used once the queue is empty
    #[must_use]
    pub fn with_default_response(mut self, response: AgentResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Queue a response
    #[must_use]
    pub fn with_response(self, response: AgentResponse) -> Self {
        self.push_response(response);
        self
    }

    /// Make `configure` fail
    #[must_use]
    pub fn with_configure_error(mut self, error: AgentError) -> Self {
        self.configure_result = Err(error);
        self
    }

    /// Make `configure` slow
    #[must_use]
    pub fn with_configure_delay(mut self, delay: Duration) -> Self {
        self.configure_delay = Some(delay);
        self
    }

    /// Make `stop` take `delay` before it completes
    #[must_use]
    pub fn with_stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = Some(delay);
        self
    }

    /// Start out unavailable
    #[must_use]
    pub fn unavailable(self) -> Self {
        self.set_available(false);
        self
    }

    /// Queue a response at runtime
    pub fn push_response(&self, response: AgentResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Toggle availability
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Push a state transition to subscribers
    pub fn emit(&self, state: AgentState) {
        let _ = self.state_tx.send(state);
    }

    /// Inputs received by `handle`, in call order
    #[must_use]
    pub fn inputs(&self) -> Vec<AgentInput> {
        self.inputs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Contexts received by `handle`, in call order
    #[must_use]
    pub fn contexts(&self) -> Vec<AgentContext> {
        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of `handle` calls
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.inputs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Configurations received by `configure`
    #[must_use]
    pub fn configs(&self) -> Vec<AgentConfiguration> {
        self.configs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `start` calls
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Number of completed `stop` calls
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    fn supported_commands(&self) -> &[CommandPattern] {
        &self.commands
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn state_stream(&self) -> broadcast::Receiver<AgentState> {
        self.state_tx.subscribe()
    }

    async fn handle(&self, input: &AgentInput, context: &AgentContext) -> AgentResponse {
        self.inputs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(input.clone());
        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(context.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        queued.unwrap_or_else(|| self.default_response.clone())
    }

    async fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.emit(AgentState::Ready);
    }

    async fn stop(&self) {
        if let Some(delay) = self.stop_delay {
            tokio::time::sleep(delay).await;
        }
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.emit(AgentState::Failed);
    }

    async fn configure(&self, config: &AgentConfiguration) -> Result<(), AgentError> {
        if let Some(delay) = self.configure_delay {
            tokio::time::sleep(delay).await;
        }
        self.configs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(config.clone());
        self.configure_result.clone()
    }
}
