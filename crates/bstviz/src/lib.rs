#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod render;
pub mod repl;

pub use cli::run_from_env;
pub use error::{CliError, Result};
