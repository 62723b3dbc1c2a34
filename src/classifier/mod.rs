//! Threshold classification over retriever scores.
//!
//! - [`Classifier`] turns one retriever's normalized score into a [`Verdict`] using a
//!   `(true, false)` threshold pair and a score direction.
//! - [`ChainedClassifier`] runs classifiers in order and stops at the first YES or NO.
//! - [`RelatednessService`] owns the live chain and replaces it wholesale when thresholds
//!   change at runtime. Retrievers (and their caches) survive every replacement.
//!
//! # Threshold consistency
//!
//! Threshold pairs are not validated. With `lower_score_indicates_true == false` the pair
//! is expected to satisfy `true >= false` (inverted otherwise); a pair that violates this
//! silently degrades the stage instead of raising an error.

pub mod chain;
pub mod error;
pub mod service;
pub mod stage;
pub mod verdict;


pub use chain::{ChainDecision, ChainedClassifier, StageOutcome, ThresholdUpdates};
pub use error::ClassifierError;
pub use service::RelatednessService;
pub use stage::{Classifier, Thresholds};
pub use verdict::Verdict;
