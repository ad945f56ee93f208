//! Error types shared across Heartify crates.

use std::path::PathBuf;

/// Top-level error type for Heartify operations.
#[derive(Debug, thiserror::Error)]
pub enum HeartifyError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using HeartifyError.
pub type HeartifyResult<T> = Result<T, HeartifyError>;

impl HeartifyError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
