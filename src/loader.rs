//! Configuration loading
//!
//! Embedded defaults, then optional files, then `JEEVES_*` environment variables.

use super::config::AppConfig;
use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let env = std::env::var("JEEVES_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", env)).required(false))
        .add_source(File::with_name("config/local").required(false))
        // JEEVES_COORDINATOR__AGENT_TIMEOUT_MS: single `_` after the prefix, `__` between keys
        .add_source(
            Environment::with_prefix("JEEVES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    into_app_config(config)
}

/// Deserialize and validate a built configuration
fn into_app_config(config: Config) -> Result<AppConfig> {
    let app: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    app.coordinator
        .validate()
        .map_err(|e| anyhow!(e.user_message()))?;
    Ok(app)
}
