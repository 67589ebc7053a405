//! Application-wide error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid recording name '{0}': must be non-empty and alphanumeric")]
    InvalidIdentifier(String),

    #[error("Recording '{0}' is already active")]
    DuplicateActive(String),

    #[error("No active recording named '{name}'")]
    NotFound { name: String },

    #[error("Failed to spawn transcoder process: {0}")]
    SpawnFailure(#[source] std::io::Error),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("No schedule with id '{id}'")]
    ScheduleNotFound { id: String },

    #[error("IO error while {op} '{path}': {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn schedule_not_found(id: impl std::fmt::Display) -> Self {
        Self::ScheduleNotFound { id: id.to_string() }
    }

    pub fn invalid_schedule(msg: impl Into<String>) -> Self {
        Self::InvalidSchedule(msg.into())
    }

    pub fn io_path(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
