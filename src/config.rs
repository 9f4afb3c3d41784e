//! Application configuration

use std::path::PathBuf;

use jeeves_core::{CoachPersonality, CoordinatorConfig};
use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub personality: CoachPersonality,
}

/// Session persistence settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the session context; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}
