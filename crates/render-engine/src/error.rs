//! Export error taxonomy.

use std::path::PathBuf;

use heartify_common::error::HeartifyError;

/// Failure while synthesizing, rasterizing, encoding, or delivering an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No usable font found (searched: {searched})")]
    FontUnavailable { searched: String },

    #[error("Invalid font {path}: {message}")]
    InvalidFont { path: PathBuf, message: String },

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Archive generation failed: {0}")]
    Archive(String),

    #[error("Failed to deliver {file_name}: {source}")]
    Delivery {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using ExportError.
pub type ExportResult<T> = Result<T, ExportError>;

impl ExportError {
    pub fn rasterize(msg: impl Into<String>) -> Self {
        Self::Rasterize(msg.into())
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

impl From<ExportError> for HeartifyError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io(e) => HeartifyError::Io(e),
            other => HeartifyError::export(other.to_string()),
        }
    }
}
