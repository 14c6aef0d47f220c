//! Application-wide error types.
//!
//! Library modules return [`Error`] via `thiserror`, while the CLI layer
//! uses `anyhow` for convenient propagation and context.
//!
//! Collisions are not errors: they are normal outcomes of planning (see
//! [`crate::organizer::PlanOutcome`]). Only conditions that must stop a run
//! mid-flight, or that skip a single file, live here.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag reading failed for one file
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// A move target appeared on disk after the plan was validated
    #[error("Target already exists: {0}")]
    TargetExists(PathBuf),

    /// A path cannot be written into the shell-formatted move line
    #[error("Path contains a double quote: {0}")]
    UnsafePath(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
