//! Relate library crate (used by the server and integration tests).
//!
//! Decides whether a snippet is related to a query by running a chain of threshold
//! classifiers, cheapest first, and stopping at the first confident answer.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Verdict`] - YES / MAYBE / NO, with the wire integer mapping
//! - [`Classifier`], [`Thresholds`] - one threshold stage over a retriever
//! - [`ChainedClassifier`], [`ChainDecision`] - first-decisive-wins composition
//! - [`RelatednessService`] - live chain with atomic threshold reconfiguration
//!
//! ## Retrieval
//! - [`Retriever`] - normalized `[0, 1]` score for a `(query, snippet)` pair
//! - [`DistanceRetriever`] - bi-encoder cosine distance, embedding cache
//! - [`CrossEncoderRetriever`] - joint cross-encoder score, pair cache
//!
//! ## Embedding
//! - [`BertEmbedder`], [`EmbedderConfig`] - CLS-pooled bi-encoder
//! - [`Reranker`], [`RerankerConfig`] - cross-encoder
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `RELATE_*` environment configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod retrieval;

pub use classifier::{
    ChainDecision, ChainedClassifier, Classifier, ClassifierError, RelatednessService,
    StageOutcome, ThresholdUpdates, Thresholds, Verdict,
};
pub use config::{Config, ConfigError};
pub use embedding::{
    BertEmbedder, EmbedderConfig, EmbeddingError, PairScorer, Reranker, RerankerConfig,
    RerankerError, TextEncoder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{CountingEncoder, CountingScorer, FailingEncoder, FailingScorer};
pub use hashing::{hash_pair, hash_text};
#[cfg(any(test, feature = "mock"))]
pub use retrieval::FixedRetriever;
pub use retrieval::{
    CrossEncoderRetriever, DistanceRetriever, RetrievalError, Retriever, SigmoidScale,
};
