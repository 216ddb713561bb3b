//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("failed to parse {name}='{value}': {message}")]
    ParseError {
        name: &'static str,
        value: String,
        message: String,
    },

    /// The confidence threshold is outside its usable range.
    #[error("invalid confidence threshold '{value}': must be > 0")]
    InvalidThreshold { value: f32 },

    /// The candidate limit must be positive.
    #[error("invalid max candidates '{value}': must be > 0")]
    InvalidMaxCandidates { value: usize },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
}
