use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::domain::GridError;

/// Install the global subscriber. The terminal belongs to the grid, so logs
/// only go to a file and nothing is installed without one.
pub fn init(log_file: Option<&str>, level: &str) -> Result<(), GridError> {
    let Some(log_file) = log_file else {
        return Ok(());
    };
    let path = expand_path(log_file)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| GridError::Logging(e.to_string()))
}

/// `RUST_LOG` wins over the command line level.
fn env_filter(level: &str) -> Result<EnvFilter, GridError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| GridError::Logging(e.to_string()))
}

fn expand_path(path: &str) -> Result<String, GridError> {
    shellexpand::full(path)
        .map(|p| p.into_owned())
        .map_err(|e| GridError::LogPath(e.to_string()))
}
