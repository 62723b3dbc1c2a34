//! Embedding + model utilities.
//!
//! These are the external scoring capabilities the retrievers sit on:
//!
//! - [`TextEncoder`] turns one text into a fixed-length vector ([`encoder::BertEmbedder`]).
//! - [`PairScorer`] scores a `(query, snippet)` pair jointly ([`reranker::Reranker`]).
//!
//! Both run in a deterministic stub mode when no model directory is configured.

/// BERT wrappers (CLS encoder and sequence classifier).
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Bi-encoder embedder.
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
/// Instrumented encoders and scorers for tests.
pub mod mock;
/// Cross-encoder reranker.
pub mod reranker;
/// Tokenizer loading helpers.
pub mod utils;

pub use encoder::{BertEmbedder, EmbedderConfig};
pub use error::EmbeddingError;
pub use reranker::{Reranker, RerankerConfig, RerankerError};

#[cfg(any(test, feature = "mock"))]
pub use mock::{CountingEncoder, CountingScorer, FailingEncoder, FailingScorer};

/// Encodes a single text into an embedding vector.
///
/// `is_query` lets asymmetric models treat queries and passages differently.
pub trait TextEncoder: Send + Sync {
    /// Returns the embedding for `text`.
    fn encode(&self, text: &str, is_query: bool) -> Result<Vec<f32>, EmbeddingError>;
}

/// Scores a `(query, snippet)` pair with a single joint forward pass.
pub trait PairScorer: Send + Sync {
    /// Returns the raw (unnormalized) relevance score; higher means more related.
    fn score(&self, query: &str, snippet: &str) -> Result<f32, RerankerError>;
}

impl<T: TextEncoder + ?Sized> TextEncoder for std::sync::Arc<T> {
    fn encode(&self, text: &str, is_query: bool) -> Result<Vec<f32>, EmbeddingError> {
        (**self).encode(text, is_query)
    }
}

impl<T: PairScorer + ?Sized> PairScorer for std::sync::Arc<T> {
    fn score(&self, query: &str, snippet: &str) -> Result<f32, RerankerError> {
        (**self).score(query, snippet)
    }
}
