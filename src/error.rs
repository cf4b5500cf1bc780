// src/error.rs

//! Error types for the batch converter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a batch or reject a package
#[derive(Error, Debug)]
pub enum Error {
    /// Source root missing, unreadable, or not a directory
    #[error("failed to read source root {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Package name is not a single safe path segment
    #[error("invalid package name {name:?}: {reason}")]
    InvalidPackageName { name: String, reason: String },

    /// Transformation tool could not be located
    #[error("conversion tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Configuration value rejected
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Generic I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an `InvalidPackageName` error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPackageName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
