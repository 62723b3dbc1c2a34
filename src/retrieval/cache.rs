//! Bounded in-memory caches for retrievers.
//!
//! Keys are BLAKE3 digests from [`crate::hashing`]; eviction is size-based (moka's
//! TinyLFU/LRU). Nothing is persisted.

use moka::sync::Cache;
use std::sync::Arc;

use crate::hashing::{hash_pair, hash_text};

/// `(text, is_query)` → embedding.
pub struct EmbeddingCache {
    entries: Cache<[u8; 32], Arc<[f32]>>,
}

impl EmbeddingCache {
    /// Creates a cache holding at most `capacity` embeddings.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    #[inline]
    pub fn get(&self, text: &str, is_query: bool) -> Option<Arc<[f32]>> {
        self.entries.get(&hash_text(text, is_query))
    }

    #[inline]
    pub fn insert(&self, text: &str, is_query: bool, embedding: Arc<[f32]>) {
        self.entries.insert(hash_text(text, is_query), embedding);
    }

    #[inline]
    pub fn contains(&self, text: &str, is_query: bool) -> bool {
        self.entries.contains_key(&hash_text(text, is_query))
    }

    /// Approximate entry count (call [`Self::run_pending_tasks`] first for an exact one).
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }

    #[inline]
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

/// `(query, snippet)` → raw joint score.
pub struct ScoreCache {
    entries: Cache<[u8; 32], f32>,
}

impl ScoreCache {
    /// Creates a cache holding at most `capacity` scores.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    #[inline]
    pub fn get(&self, query: &str, snippet: &str) -> Option<f32> {
        self.entries.get(&hash_pair(query, snippet))
    }

    #[inline]
    pub fn insert(&self, query: &str, snippet: &str, score: f32) {
        self.entries.insert(hash_pair(query, snippet), score);
    }

    #[inline]
    pub fn contains(&self, query: &str, snippet: &str) -> bool {
        self.entries.contains_key(&hash_pair(query, snippet))
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }

    #[inline]
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl std::fmt::Debug for ScoreCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
