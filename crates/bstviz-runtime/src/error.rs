//! Errors from loading configuration and driving a session.

use std::path::PathBuf;

use bstviz_core::EngineError;
use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Everything that can go wrong outside the engine itself.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown fields.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config parsed but holds values the engine cannot use.
    #[error("invalid config: {}", problems.join("; "))]
    InvalidConfig { problems: Vec<String> },

    /// Rejected input, passed through from the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The worker is gone; nothing more can be queued.
    #[error("session worker has shut down")]
    SessionClosed,
}

impl RuntimeError {
    /// Collect the problems reported by validation.
    #[must_use]
    pub fn invalid_config(problems: Vec<String>) -> Self {
        Self::InvalidConfig { problems }
    }
}
