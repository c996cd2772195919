//! Error types shared across Recut crates.

use std::path::PathBuf;

/// Top-level error type for Recut operations.
#[derive(Debug, thiserror::Error)]
pub enum RecutError {
    #[error("Timeline edit error: {message}")]
    Edit { message: String },

    #[error("Metadata unavailable for recording {recording_id}: {message}")]
    Metadata {
        recording_id: String,
        message: String,
    },

    #[error("Effect generation error: {message}")]
    Generation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RecutError.
pub type RecutResult<T> = Result<T, RecutError>;

impl RecutError {
    pub fn edit(msg: impl Into<String>) -> Self {
        Self::Edit {
            message: msg.into(),
        }
    }

    pub fn metadata(recording_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Metadata {
            recording_id: recording_id.into(),
            message: msg.into(),
        }
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
