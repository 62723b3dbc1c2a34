use std::path::PathBuf;
use thiserror::Error;

/// Failures loading or running the bi-encoder (and shared model plumbing).
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("bi-encoder model directory not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load bi-encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("bi-encoder forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenizer error: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid bi-encoder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
