use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::RetrievalError;
use super::Retriever;
use crate::embedding::EmbeddingError;

/// Retriever returning a scripted score and counting calls.
#[derive(Debug)]
pub struct FixedRetriever {
    score: Mutex<Result<f32, String>>,
    calls: AtomicUsize,
}

impl FixedRetriever {
    pub fn new(score: f32) -> Self {
        Self {
            score: Mutex::new(Ok(score)),
            calls: AtomicUsize::new(0),
        }
    }

    /// A retriever whose every prediction fails with an inference error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            score: Mutex::new(Err(reason.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Changes the score returned by later predictions.
    pub fn set_score(&self, score: f32) {
        *self.score.lock() = Ok(score);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Retriever for FixedRetriever {
    fn predict(&self, _query: &str, _snippet: &str) -> Result<f32, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.score.lock().clone().map_err(|reason| {
            RetrievalError::Embedding(EmbeddingError::InferenceFailed { reason })
        })
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}
