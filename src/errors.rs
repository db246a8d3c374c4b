//! Error types for the few operations that can genuinely fail.
//!
//! Planning itself never returns an error: per-contract and per-property
//! problems become [`Diagnostic`](crate::diagnostics::Diagnostic)s. Only
//! reading the inputs from disk and decoding them can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for persistplan operations
#[derive(Debug, Error)]
pub enum PlannerError {
    /// File system related errors
    #[error("{message} {path}: {source}")]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be decoded
    #[error("Configuration error in {path}: {source}")]
    Configuration {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Model document could not be decoded
    #[error("Model error in {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PlannerError {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.into(),
            source,
        }
    }
}
