use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Faults raised by the engine. Gameplay collisions are not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid engine state: {0}")]
    InvalidState(String),

    #[error("no free cell left for food in a {width}x{height} grid after {attempts} samples")]
    NoFreeCell {
        width: u16,
        height: u16,
        attempts: u32,
    },
}

/// Failures while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] EngineError),
}

/// Failures while installing the file log sink.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid log filter")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}
