//! Retrievers: normalized relatedness scores for `(query, snippet)` pairs.
//!
//! A retriever computes a raw score with one strategy and maps it through a scaled
//! sigmoid ([`SigmoidScale`]) into `[0, 1]`:
//!
//! - [`DistanceRetriever`] encodes query and snippet separately and uses the cosine
//!   distance (lower means more related). Embeddings are cached per `(text, is_query)`.
//! - [`CrossEncoderRetriever`] scores the pair jointly and reports the complement of
//!   the normalized logit (lower means more related).
//!   Raw scores are cached per pair.
//!
//! Repeating a pair never re-invokes the encoder or scorer while the entries are cached.
//! Caches are bounded ([`crate::constants::DEFAULT_CACHE_CAPACITY`] by default) and live
//! as long as the retriever, which is shared across chain reconfigurations.

pub mod cache;
pub mod cross_encoder;
pub mod distance;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod sigmoid;

#[cfg(test)]
mod tests;

pub use cache::{EmbeddingCache, ScoreCache};
pub use cross_encoder::CrossEncoderRetriever;
pub use distance::{DistanceRetriever, cosine_distance};
pub use error::RetrievalError;
#[cfg(any(test, feature = "mock"))]
pub use mock::FixedRetriever;
pub use sigmoid::SigmoidScale;

/// Produces a normalized relatedness score in `[0, 1]` for a `(query, snippet)` pair.
pub trait Retriever: Send + Sync {
    /// Scores the pair. Encoder/scorer failures propagate; nothing is retried.
    fn predict(&self, query: &str, snippet: &str) -> Result<f32, RetrievalError>;

    /// Short name of the scoring strategy (for logs and debug output).
    fn kind(&self) -> &'static str;
}

impl std::fmt::Debug for dyn Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("kind", &self.kind())
            .finish()
    }
}
