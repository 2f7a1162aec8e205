//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "BSTVIZ_LOG";

/// Filter used when neither `--log-level` nor [`LOG_ENV`] is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Build the filter: an explicit level wins over the environment.
pub fn filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| CliError::Logging {
            message: e.to_string(),
        }),
        None => Ok(EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Install the global subscriber. Logs go to stderr so they never mix
/// with rendered trees on stdout.
pub fn init(level: Option<&str>, json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}
