use thiserror::Error;

use crate::embedding::{EmbeddingError, RerankerError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("encoding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("pair scoring failed: {0}")]
    Reranker(#[from] RerankerError),

    #[error("embedding dimensions differ: query has {query}, snippet has {snippet}")]
    DimensionMismatch { query: usize, snippet: usize },
}
