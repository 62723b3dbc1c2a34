use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use super::chain::{ChainDecision, ChainedClassifier, ThresholdUpdates};
use super::error::ClassifierError;
use super::stage::Thresholds;

/// Owns the live chain and swaps it atomically on reconfiguration.
///
/// Readers take an `Arc` snapshot and release the lock before any inference runs, so a
/// classification always sees one complete chain. Writers build the replacement chain
/// under the write lock (no model loading happens there) and swap the pointer.
#[derive(Debug)]
pub struct RelatednessService {
    chain: RwLock<Arc<ChainedClassifier>>,
}

impl RelatednessService {
    pub fn new(chain: ChainedClassifier) -> Self {
        Self {
            chain: RwLock::new(Arc::new(chain)),
        }
    }

    /// The chain currently in effect.
    pub fn snapshot(&self) -> Arc<ChainedClassifier> {
        Arc::clone(&self.chain.read())
    }

    /// Applies `updates` and returns the chain this call installed (or the current one if
    /// nothing changed) together with the changed stage names.
    pub fn reconfigure(
        &self,
        updates: &ThresholdUpdates,
    ) -> Result<(Arc<ChainedClassifier>, Vec<String>), ClassifierError> {
        let mut current = self.chain.write();
        let (next, changed) = current.with_thresholds(updates)?;

        if changed.is_empty() {
            return Ok((Arc::clone(&current), changed));
        }

        let next = Arc::new(next);
        *current = Arc::clone(&next);

        info!(
            changed = ?changed,
            thresholds = ?next.thresholds(),
            "Classifier chain reconfigured"
        );

        Ok((next, changed))
    }

    /// Applies `updates`, returning the changed stage names.
    pub fn update_thresholds(
        &self,
        updates: &ThresholdUpdates,
    ) -> Result<Vec<String>, ClassifierError> {
        self.reconfigure(updates).map(|(_, changed)| changed)
    }

    /// Classifies a pair, applying `updates` first when given.
    ///
    /// With updates, the pair is classified by exactly the chain those updates produced,
    /// even if another reconfiguration lands concurrently.
    pub fn classify(
        &self,
        query: &str,
        snippet: &str,
        updates: Option<&ThresholdUpdates>,
    ) -> Result<ChainDecision, ClassifierError> {
        let chain = match updates {
            Some(updates) if !updates.is_empty() => self.reconfigure(updates)?.0,
            _ => self.snapshot(),
        };

        chain.classify_detailed(query, snippet)
    }

    pub fn thresholds(&self) -> Vec<(String, Thresholds)> {
        self.snapshot().thresholds()
    }
}
