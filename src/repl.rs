//! Session runner
//!
//! Owns the coordinator for one process lifetime and carries the session
//! context from one command to the next.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use jeeves_agents::TimerAgent;
use jeeves_core::{
    AgentContext, AgentInput, Coordinator, InputSource, JsonFileStore, MemoryStore, SessionStore,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::AppConfig;

pub struct App {
    coordinator: Coordinator,
    context: Mutex<AgentContext>,
}

impl App {
    /// Build the coordinator, register the built-in agents, apply the
    /// configured personality, and load the session context.
    pub async fn start(config: AppConfig, session: Option<PathBuf>) -> Result<Self> {
        let store: Arc<dyn SessionStore> = match session {
            Some(path) => {
                info!(path = %path.display(), "Using session file");
                Arc::new(JsonFileStore::new(path))
            }
            None => Arc::new(MemoryStore::new()),
        };

        let coordinator = Coordinator::new(config.coordinator, store);
        coordinator.register(Arc::new(TimerAgent::new())).await;

        let report = coordinator.set_personality(&config.personality).await;
        for name in report.failed() {
            warn!(agent = %name, "Personality not applied");
        }

        let context = match coordinator.load_context().await {
            Ok(context) => context,
            Err(e) => {
                error!(error = %e, "Failed to load session context");
                coordinator.shutdown().await;
                return Err(anyhow!(e.user_message()));
            }
        };
        info!(
            session_id = %context.cold.session_id,
            "Jeeves v{} ready",
            env!("CARGO_PKG_VERSION")
        );

        Ok(Self {
            coordinator,
            context: Mutex::new(context),
        })
    }

    /// Dispatch one input and return the text to show the user
    pub async fn handle(&self, source: InputSource, data: &str) -> String {
        let mut context = self.context.lock().await;
        let outcome = self
            .coordinator
            .process(AgentInput::new(source, data), context.clone())
            .await;
        *context = outcome.context;
        outcome.response.display_text()
    }

    /// Dispatch one input and print the response
    pub async fn send(&self, source: InputSource, data: &str) -> Result<()> {
        println!("{}", self.handle(source, data).await);
        Ok(())
    }

    /// Read commands from stdin until EOF or `quit`
    pub async fn repl(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "quit" | "exit") {
                break;
            }

            let reply = self.handle(InputSource::Text, line).await;
            stdout.write_all(format!("{}\n", reply).as_bytes()).await?;
        }
        Ok(())
    }

    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }
}
