use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::error::ClassifierError;
use super::verdict::Verdict;
use crate::retrieval::Retriever;

/// A `(true_threshold, false_threshold)` pair, `[true, false]` on the wire.
///
/// The pair is taken as given: nothing checks that it is ordered consistently with the
/// classifier's score direction. An inconsistent pair yields a classifier that never
/// says YES or never says NO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Thresholds {
    pub true_threshold: f32,
    pub false_threshold: f32,
}

impl Thresholds {
    pub const fn new(true_threshold: f32, false_threshold: f32) -> Self {
        Self {
            true_threshold,
            false_threshold,
        }
    }
}

impl From<[f32; 2]> for Thresholds {
    fn from([true_threshold, false_threshold]: [f32; 2]) -> Self {
        Self::new(true_threshold, false_threshold)
    }
}

impl From<Thresholds> for [f32; 2] {
    fn from(thresholds: Thresholds) -> Self {
        [thresholds.true_threshold, thresholds.false_threshold]
    }
}

/// One threshold stage: a retriever score turned into a [`Verdict`].
///
/// Immutable. Changing thresholds builds a new classifier that shares the retriever
/// (and therefore its cache) with the old one; see [`Classifier::with_thresholds`].
#[derive(Clone)]
pub struct Classifier {
    name: String,
    retriever: Arc<dyn Retriever>,
    thresholds: Thresholds,
    lower_score_indicates_true: bool,
}

impl Classifier {
    pub fn new(
        name: impl Into<String>,
        retriever: Arc<dyn Retriever>,
        thresholds: Thresholds,
        lower_score_indicates_true: bool,
    ) -> Self {
        Self {
            name: name.into(),
            retriever,
            thresholds,
            lower_score_indicates_true,
        }
    }

    /// Applies the thresholds to a normalized score.
    ///
    /// Higher-is-true: `score >= true` is YES, then `score <= false` is NO.
    /// Lower-is-true: `score >= false` is NO, then `score <= true` is YES.
    /// Anything else (including NaN) is MAYBE. Both bounds are inclusive, and the first
    /// matching rule wins when the bounds overlap.
    pub fn decide(&self, score: f32) -> Verdict {
        let Thresholds {
            true_threshold,
            false_threshold,
        } = self.thresholds;

        if self.lower_score_indicates_true {
            if score >= false_threshold {
                Verdict::No
            } else if score <= true_threshold {
                Verdict::Yes
            } else {
                Verdict::Maybe
            }
        } else if score >= true_threshold {
            Verdict::Yes
        } else if score <= false_threshold {
            Verdict::No
        } else {
            Verdict::Maybe
        }
    }

    /// Normalized retriever score for the pair.
    pub fn score(&self, query: &str, snippet: &str) -> Result<f32, ClassifierError> {
        self.retriever
            .predict(query, snippet)
            .map_err(|source| ClassifierError::Retrieval {
                stage: self.name.clone(),
                source,
            })
    }

    pub fn classify(&self, query: &str, snippet: &str) -> Result<Verdict, ClassifierError> {
        self.score_and_classify(query, snippet)
            .map(|(_, verdict)| verdict)
    }

    pub fn score_and_classify(
        &self,
        query: &str,
        snippet: &str,
    ) -> Result<(f32, Verdict), ClassifierError> {
        let score = self.score(query, snippet)?;
        let verdict = self.decide(score);

        debug!(
            stage = %self.name,
            score,
            %verdict,
            true_threshold = self.thresholds.true_threshold,
            false_threshold = self.thresholds.false_threshold,
            "Stage classified pair"
        );

        Ok((score, verdict))
    }

    /// Same stage and retriever, new thresholds.
    pub fn with_thresholds(&self, thresholds: Thresholds) -> Self {
        Self {
            name: self.name.clone(),
            retriever: Arc::clone(&self.retriever),
            thresholds,
            lower_score_indicates_true: self.lower_score_indicates_true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn retriever(&self) -> &Arc<dyn Retriever> {
        &self.retriever
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn lower_score_indicates_true(&self) -> bool {
        self.lower_score_indicates_true
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("name", &self.name)
            .field("retriever", &self.retriever.kind())
            .field("thresholds", &self.thresholds)
            .field("lower_score_indicates_true", &self.lower_score_indicates_true)
            .finish()
    }
}
