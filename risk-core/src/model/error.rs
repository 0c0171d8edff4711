//! Model errors

use std::path::PathBuf;

use crate::features::LayoutMismatchError;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Vector length does not match what the artifact was fitted on
    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    /// Artifacts failed to load at startup
    #[error("classification unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("failed to access artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<(), ModelError> {
        if expected != actual {
            return Err(ModelError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}
