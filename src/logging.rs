//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {source}")]
    Filter { filter: String, source: ParseError },
    #[error("failed to install logger: {0}")]
    Install(String),
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `default_filter`.
///
/// # Errors
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|source| LoggingError::Filter { filter: default_filter.to_owned(), source })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
