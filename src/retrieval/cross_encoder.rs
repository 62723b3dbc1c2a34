use tracing::debug;

use super::cache::ScoreCache;
use super::error::RetrievalError;
use super::sigmoid::SigmoidScale;
use super::Retriever;
use crate::constants::{DEFAULT_CACHE_CAPACITY, RERANKER_SIGMOID_SCALE, RERANKER_SIGMOID_SHIFT};
use crate::embedding::PairScorer;

/// Joint-encoding retriever: the pair goes through the cross-encoder in one pass.
///
/// Reports `1 - sigmoid(logit)`, so like [`super::DistanceRetriever`] a lower score
/// means more related.
pub struct CrossEncoderRetriever<S: PairScorer> {
    scorer: S,
    sigmoid: SigmoidScale,
    cache: ScoreCache,
}

impl<S: PairScorer> CrossEncoderRetriever<S> {
    pub fn new(scorer: S, sigmoid: SigmoidScale, cache_capacity: u64) -> Self {
        Self {
            scorer,
            sigmoid,
            cache: ScoreCache::with_capacity(cache_capacity),
        }
    }

    /// Uses the default sigmoid and cache capacity.
    pub fn with_defaults(scorer: S) -> Self {
        Self::new(
            scorer,
            SigmoidScale::new(RERANKER_SIGMOID_SHIFT, RERANKER_SIGMOID_SCALE),
            DEFAULT_CACHE_CAPACITY,
        )
    }

    /// Cross-encoder score before normalization.
    pub fn raw_score(&self, query: &str, snippet: &str) -> Result<f32, RetrievalError> {
        if let Some(hit) = self.cache.get(query, snippet) {
            return Ok(hit);
        }

        let score = self.scorer.score(query, snippet)?;
        self.cache.insert(query, snippet, score);

        debug!(
            query_len = query.len(),
            snippet_len = snippet.len(),
            raw_score = score,
            "Cached new pair score"
        );

        Ok(score)
    }

    pub fn sigmoid(&self) -> SigmoidScale {
        self.sigmoid
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }
}

impl<S: PairScorer> Retriever for CrossEncoderRetriever<S> {
    fn predict(&self, query: &str, snippet: &str) -> Result<f32, RetrievalError> {
        let raw = self.raw_score(query, snippet)?;
        Ok(1.0 - self.sigmoid.apply(raw))
    }

    fn kind(&self) -> &'static str {
        "cross_encoder"
    }
}

impl<S: PairScorer> std::fmt::Debug for CrossEncoderRetriever<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoderRetriever")
            .field("sigmoid", &self.sigmoid)
            .field("cache", &self.cache)
            .finish()
    }
}
