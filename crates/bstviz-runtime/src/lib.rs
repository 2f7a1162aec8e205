#![forbid(unsafe_code)]

//! bstviz runtime
//!
//! Controller plumbing around [`bstviz_core::TreeEngine`]:
//!
//! - [`Session`] - the engine on a worker thread behind a command queue
//! - [`TrainerConfig`] - TOML configuration with validated defaults
//! - [`fill`] - seeded or OS-random tree contents

pub mod command;
pub mod config;
pub mod error;
pub mod fill;
pub mod session;

pub use command::{Command, Outcome};
pub use config::TrainerConfig;
pub use error::{Result, RuntimeError};
pub use fill::{DEFAULT_FILL_COUNT, random_keys};
pub use session::{Session, Ticket};
