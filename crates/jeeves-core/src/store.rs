//! Session storage backends
//!
//! The coordinator only needs to load and save one opaque context. Two
//! backends are provided:
//! - `MemoryStore` keeps the context in process (tests, throwaway sessions)
//! - `JsonFileStore` persists it as a JSON document on disk

use crate::context::AgentContext;
use crate::error::StorageError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Storage result type
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Session store trait for abstracting storage backends
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the current context. An empty store yields a fresh default context.
    async fn load(&self) -> StorageResult<AgentContext>;

    /// Persist the context
    async fn save(&self, context: &AgentContext) -> StorageResult<()>;
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemoryStore {
    context: RwLock<Option<AgentContext>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a context
    #[must_use]
    pub fn with_context(context: AgentContext) -> Self {
        Self {
            context: RwLock::new(Some(context)),
        }
    }

    /// Last saved context, if any
    pub async fn snapshot(&self) -> Option<AgentContext> {
        self.context.read().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self) -> StorageResult<AgentContext> {
        Ok(self.context.read().await.clone().unwrap_or_default())
    }

    async fn save(&self, context: &AgentContext) -> StorageResult<()> {
        *self.context.write().await = Some(context.clone());
        debug!(session_id = %context.cold.session_id, "Session saved in memory");
        Ok(())
    }
}

/// JSON file backed session store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStore for JsonFileStore {
    async fn load(&self) -> StorageResult<AgentContext> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No saved session, starting fresh");
                return Ok(AgentContext::default());
            }
            Err(e) => return Err(e.into()),
        };
        let context: AgentContext = serde_json::from_slice(&bytes)?;
        debug!(
            path = %self.path.display(),
            tasks = context.warm.tasks.len(),
            "Loaded session"
        );
        Ok(context)
    }

    async fn save(&self, context: &AgentContext) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(context)?;

        // Write-then-rename so a crash never leaves a truncated session file
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(
            path = %self.path.display(),
            session_id = %context.cold.session_id,
            "Session saved"
        );
        Ok(())
    }
}
