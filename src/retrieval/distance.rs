use std::sync::Arc;
use tracing::debug;

use super::cache::EmbeddingCache;
use super::error::RetrievalError;
use super::sigmoid::SigmoidScale;
use super::Retriever;
use crate::constants::{DEFAULT_CACHE_CAPACITY, DISTANCE_SIGMOID_SCALE, DISTANCE_SIGMOID_SHIFT};
use crate::embedding::TextEncoder;

/// Separate-encoding retriever: normalized cosine distance between query and snippet.
///
/// Lower scores mean more related, so its classifier runs with
/// `lower_score_indicates_true`.
pub struct DistanceRetriever<E: TextEncoder> {
    encoder: E,
    sigmoid: SigmoidScale,
    cache: EmbeddingCache,
}

impl<E: TextEncoder> DistanceRetriever<E> {
    pub fn new(encoder: E, sigmoid: SigmoidScale, cache_capacity: u64) -> Self {
        Self {
            encoder,
            sigmoid,
            cache: EmbeddingCache::with_capacity(cache_capacity),
        }
    }

    /// Uses the default sigmoid and cache capacity.
    pub fn with_defaults(encoder: E) -> Self {
        Self::new(
            encoder,
            SigmoidScale::new(DISTANCE_SIGMOID_SHIFT, DISTANCE_SIGMOID_SCALE),
            DEFAULT_CACHE_CAPACITY,
        )
    }

    /// Cosine distance before normalization.
    pub fn raw_distance(&self, query: &str, snippet: &str) -> Result<f32, RetrievalError> {
        let query_embedding = self.embedding(query, true)?;
        let snippet_embedding = self.embedding(snippet, false)?;

        cosine_distance(&query_embedding, &snippet_embedding)
    }

    fn embedding(&self, text: &str, is_query: bool) -> Result<Arc<[f32]>, RetrievalError> {
        if let Some(hit) = self.cache.get(text, is_query) {
            return Ok(hit);
        }

        let embedding: Arc<[f32]> = self.encoder.encode(text, is_query)?.into();
        self.cache.insert(text, is_query, Arc::clone(&embedding));

        debug!(
            text_len = text.len(),
            is_query,
            dim = embedding.len(),
            "Cached new embedding"
        );

        Ok(embedding)
    }

    pub fn sigmoid(&self) -> SigmoidScale {
        self.sigmoid
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

impl<E: TextEncoder> Retriever for DistanceRetriever<E> {
    fn predict(&self, query: &str, snippet: &str) -> Result<f32, RetrievalError> {
        let distance = self.raw_distance(query, snippet)?;
        Ok(self.sigmoid.apply(distance))
    }

    fn kind(&self) -> &'static str {
        "distance"
    }
}

impl<E: TextEncoder> std::fmt::Debug for DistanceRetriever<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceRetriever")
            .field("sigmoid", &self.sigmoid)
            .field("cache", &self.cache)
            .finish()
    }
}

/// `1 - cos(a, b)`, in `[0, 2]`. A zero vector is treated as unrelated to everything (1.0).
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f32, RetrievalError> {
    if a.len() != b.len() {
        return Err(RetrievalError::DimensionMismatch {
            query: a.len(),
            snippet: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(1.0);
    }

    let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0);
    Ok(1.0 - cosine)
}
