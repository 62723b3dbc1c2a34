use std::sync::atomic::{AtomicUsize, Ordering};

use crate::embedding::{EmbeddingError, PairScorer, RerankerError, TextEncoder};

/// Encoder that counts invocations and returns a deterministic unit vector per text.
///
/// Texts whose first bytes agree modulo 3 encode identically (cosine distance 0);
/// all other pairs are orthogonal (cosine distance 1).
#[derive(Debug, Default)]
pub struct CountingEncoder {
    calls: AtomicUsize,
}

impl CountingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextEncoder for CountingEncoder {
    fn encode(&self, text: &str, _is_query: bool) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut embedding = vec![0.0; 3];
        let first = text.bytes().next().unwrap_or(0) as usize;
        embedding[first % 3] = 1.0;
        Ok(embedding)
    }
}

/// Pair scorer that counts invocations and returns a fixed raw score.
#[derive(Debug)]
pub struct CountingScorer {
    score: f32,
    calls: AtomicUsize,
}

impl CountingScorer {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PairScorer for CountingScorer {
    fn score(&self, _query: &str, _snippet: &str) -> Result<f32, RerankerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}

/// Encoder that always fails, e.g. to mimic an over-long input.
#[derive(Debug, Default)]
pub struct FailingEncoder {
    calls: AtomicUsize,
}

impl FailingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextEncoder for FailingEncoder {
    fn encode(&self, text: &str, _is_query: bool) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::InferenceFailed {
            reason: format!("input of {} bytes exceeds model limit", text.len()),
        })
    }
}

/// Pair scorer that always fails.
#[derive(Debug, Default)]
pub struct FailingScorer;

impl PairScorer for FailingScorer {
    fn score(&self, _query: &str, _snippet: &str) -> Result<f32, RerankerError> {
        Err(RerankerError::InferenceFailed {
            reason: "model unavailable".to_string(),
        })
    }
}
