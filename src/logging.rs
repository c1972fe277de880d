use std::env;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::LogError;

/// Filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Routes `tracing` events to `path`, appending.
///
/// The terminal belongs to the game screen, so logs never go to stdout or
/// stderr. `RUST_LOG` takes precedence over `filter` when set.
pub fn init_file_logging(path: &Path, filter: &str) -> Result<(), LogError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let filter = build_filter(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|error| LogError::Install(error.to_string()))
}

fn build_filter(from_env: Option<&str>, fallback: &str) -> Result<EnvFilter, LogError> {
    let directives = from_env.filter(|raw| !raw.trim().is_empty()).unwrap_or(fallback);
    Ok(EnvFilter::try_new(directives)?)
}
