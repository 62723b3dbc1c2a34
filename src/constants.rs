//! Cross-cutting, shared constants.
//!
//! Stage names double as the keys accepted by threshold updates on the wire, so
//! changing them breaks existing clients.

/// Stage name of the bi-encoder cosine-distance classifier (runs first).
pub const DISTANCE_STAGE: &str = "Distance";

/// Stage name of the cross-encoder reranker classifier (runs second).
pub const RERANKER_STAGE: &str = "HF";

/// Raw cosine distance mapped to 0.5 by the distance retriever.
pub const DISTANCE_SIGMOID_SHIFT: f32 = 0.3;
/// Steepness of the distance retriever's logistic curve.
pub const DISTANCE_SIGMOID_SCALE: f32 = 10.0;

/// Reranker logits in roughly `[-10, 2]` land on a large region of `[0, 1]`.
pub const RERANKER_SIGMOID_SHIFT: f32 = -4.0;
/// Steepness of the reranker retriever's logistic curve.
pub const RERANKER_SIGMOID_SCALE: f32 = 0.3;

/// Distance stage: normalized distance at or below this is related.
pub const DEFAULT_DISTANCE_TRUE_THRESHOLD: f32 = 0.25;
/// Distance stage: normalized distance at or above this is unrelated.
pub const DEFAULT_DISTANCE_FALSE_THRESHOLD: f32 = 0.75;

/// Reranker stage: normalized distance at or below this is related.
pub const DEFAULT_RERANKER_TRUE_THRESHOLD: f32 = 0.6185;
/// Reranker stage: normalized distance at or above this is unrelated.
pub const DEFAULT_RERANKER_FALSE_THRESHOLD: f32 = 0.8376;

/// Max entries held by each retriever cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Max tokens fed to either model.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Dimension of stub embeddings (matches bge-small).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Port the classification daemon listens on by default.
pub const DEFAULT_PORT: u16 = 7871;

/// Response header carrying a short machine-readable status.
pub const RELATE_STATUS_HEADER: &str = "x-relate-status";
/// Status header value for liveness responses.
pub const RELATE_STATUS_HEALTHY: &str = "healthy";
/// Status header value for successful classifications.
pub const RELATE_STATUS_CLASSIFIED: &str = "classified";
/// Status header value for threshold reads and updates.
pub const RELATE_STATUS_THRESHOLDS: &str = "thresholds";
/// Status header value for responses that carry no more specific status.
pub const RELATE_STATUS_ERROR: &str = "error";
