//! Error types for jeeves-core
//!
//! Agent-level failures never surface as `Error`: the dispatcher folds them
//! into [`AgentResponse`](crate::agent::AgentResponse) values. The types here
//! cover the collaborators around the engine (session storage, configuration).

use thiserror::Error;

/// Session store failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored context could not be encoded or decoded
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Session store failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration
    #[error("invalid configuration: {field}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Message shown to the user by the CLI when start-up fails.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Error::Storage(e) => format!("Could not access the saved session: {}", e),
            Error::InvalidConfig { field, message } => {
                format!("Configuration error in '{}': {}", field, message)
            }
        }
    }
}
