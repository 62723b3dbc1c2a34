use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::error::ClassifierError;
use super::stage::{Classifier, Thresholds};
use super::verdict::Verdict;
use crate::constants::{
    DEFAULT_DISTANCE_FALSE_THRESHOLD, DEFAULT_DISTANCE_TRUE_THRESHOLD,
    DEFAULT_RERANKER_FALSE_THRESHOLD, DEFAULT_RERANKER_TRUE_THRESHOLD, DISTANCE_SIGMOID_SCALE,
    DISTANCE_SIGMOID_SHIFT, DISTANCE_STAGE, RERANKER_SIGMOID_SCALE, RERANKER_SIGMOID_SHIFT,
    RERANKER_STAGE,
};
use crate::embedding::{PairScorer, TextEncoder};
use crate::retrieval::{CrossEncoderRetriever, DistanceRetriever, Retriever, SigmoidScale};

/// Stage name → replacement thresholds.
pub type ThresholdUpdates = BTreeMap<String, Thresholds>;

/// What one stage said about a pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    pub stage: String,
    pub score: f32,
    pub verdict: Verdict,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Final verdict plus the stages that actually ran, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainDecision {
    pub verdict: Verdict,
    /// Stage that returned the decisive verdict; `None` when every stage said MAYBE.
    pub decided_by: Option<String>,
    pub stages: Vec<StageOutcome>,
}

/// Ordered classifiers evaluated with first-decisive-wins semantics.
///
/// Stages run in construction order. The first YES or NO ends the evaluation and later
/// stages are never invoked; MAYBE defers to the next stage; a chain where every stage
/// says MAYBE (or an empty chain) says MAYBE. Put cheap stages first.
#[derive(Debug, Clone)]
pub struct ChainedClassifier {
    stages: Vec<Arc<Classifier>>,
}

impl ChainedClassifier {
    /// Builds a chain; stage names must be unique.
    pub fn new(stages: Vec<Classifier>) -> Result<Self, ClassifierError> {
        Self::from_shared(stages.into_iter().map(Arc::new).collect())
    }

    /// Builds a chain from already shared stages; stage names must be unique.
    pub fn from_shared(stages: Vec<Arc<Classifier>>) -> Result<Self, ClassifierError> {
        let mut seen = HashSet::with_capacity(stages.len());
        for stage in &stages {
            if !seen.insert(stage.name()) {
                return Err(ClassifierError::DuplicateStage {
                    name: stage.name().to_string(),
                });
            }
        }

        Ok(Self { stages })
    }

    /// The default two-stage chain: bi-encoder distance, then cross-encoder reranker.
    ///
    /// Both stages score distances, so lower is true for both.
    pub fn standard(distance: Arc<dyn Retriever>, reranker: Arc<dyn Retriever>) -> Self {
        Self {
            stages: vec![
                Arc::new(Classifier::new(
                    DISTANCE_STAGE,
                    distance,
                    Thresholds::new(
                        DEFAULT_DISTANCE_TRUE_THRESHOLD,
                        DEFAULT_DISTANCE_FALSE_THRESHOLD,
                    ),
                    true,
                )),
                Arc::new(Classifier::new(
                    RERANKER_STAGE,
                    reranker,
                    Thresholds::new(
                        DEFAULT_RERANKER_TRUE_THRESHOLD,
                        DEFAULT_RERANKER_FALSE_THRESHOLD,
                    ),
                    true,
                )),
            ],
        }
    }

    /// [`ChainedClassifier::standard`] over a bi-encoder and a cross-encoder, each wrapped
    /// in a retriever with the default sigmoid and a cache of `cache_capacity` entries.
    pub fn from_models<E, S>(encoder: E, scorer: S, cache_capacity: u64) -> Self
    where
        E: TextEncoder + 'static,
        S: PairScorer + 'static,
    {
        let distance = DistanceRetriever::new(
            encoder,
            SigmoidScale::new(DISTANCE_SIGMOID_SHIFT, DISTANCE_SIGMOID_SCALE),
            cache_capacity,
        );
        let cross_encoder = CrossEncoderRetriever::new(
            scorer,
            SigmoidScale::new(RERANKER_SIGMOID_SHIFT, RERANKER_SIGMOID_SCALE),
            cache_capacity,
        );

        Self::standard(Arc::new(distance), Arc::new(cross_encoder))
    }

    pub fn classify(&self, query: &str, snippet: &str) -> Result<Verdict, ClassifierError> {
        self.classify_detailed(query, snippet)
            .map(|decision| decision.verdict)
    }

    pub fn classify_detailed(
        &self,
        query: &str,
        snippet: &str,
    ) -> Result<ChainDecision, ClassifierError> {
        let mut outcomes = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let start = Instant::now();
            let (score, verdict) = stage.score_and_classify(query, snippet)?;

            outcomes.push(StageOutcome {
                stage: stage.name().to_string(),
                score,
                verdict,
                elapsed: start.elapsed(),
            });

            if verdict.is_decisive() {
                debug!(stage = stage.name(), %verdict, "Chain short-circuited");
                return Ok(ChainDecision {
                    verdict,
                    decided_by: Some(stage.name().to_string()),
                    stages: outcomes,
                });
            }
        }

        debug!(stages = outcomes.len(), "Every stage deferred, chain says MAYBE");
        Ok(ChainDecision {
            verdict: Verdict::Maybe,
            decided_by: None,
            stages: outcomes,
        })
    }

    /// Returns a chain with `updates` applied, plus the names of the stages that changed.
    ///
    /// Stages whose pair is unchanged (exact comparison) are shared with `self`. Changed
    /// stages are rebuilt around the same retriever. Unknown names fail the whole update.
    pub fn with_thresholds(
        &self,
        updates: &ThresholdUpdates,
    ) -> Result<(Self, Vec<String>), ClassifierError> {
        if let Some(name) = updates.keys().find(|name| self.stage(name).is_none()) {
            return Err(ClassifierError::UnknownStage {
                name: name.clone(),
                known: self.stage_names().join(", "),
            });
        }

        let mut changed = Vec::new();
        let stages = self
            .stages
            .iter()
            .map(|stage| match updates.get(stage.name()) {
                Some(thresholds) if *thresholds != stage.thresholds() => {
                    changed.push(stage.name().to_string());
                    Arc::new(stage.with_thresholds(*thresholds))
                }
                _ => Arc::clone(stage),
            })
            .collect();

        Ok((Self { stages }, changed))
    }

    pub fn stage(&self, name: &str) -> Option<&Arc<Classifier>> {
        self.stages.iter().find(|stage| stage.name() == name)
    }

    pub fn stages(&self) -> &[Arc<Classifier>] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Current thresholds in chain order.
    pub fn thresholds(&self) -> Vec<(String, Thresholds)> {
        self.stages
            .iter()
            .map(|stage| (stage.name().to_string(), stage.thresholds()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
