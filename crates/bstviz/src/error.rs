use std::path::PathBuf;

use bstviz_core::EngineError;
use bstviz_runtime::RuntimeError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("unknown command: {input} (try `help`)")]
    UnknownCommand { input: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{}:{line}: {source}", path.display())]
    Script {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<CliError>,
    },

    #[error("failed to install log subscriber: {message}")]
    Logging { message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownCommand { .. } | Self::InvalidArgument { .. } | Self::Engine(_) => 2,
            Self::Runtime(RuntimeError::InvalidConfig { .. } | RuntimeError::Toml(_)) => 78,
            Self::Script { source, .. } => source.exit_code(),
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
