//! BLAKE3 cache keys for retriever caches.
//!
//! Keys are full 256-bit digests: a collision would silently return another
//! text's embedding, so nothing here is truncated.

use blake3::Hasher;

const QUERY_TAG: u8 = b'q';
const SNIPPET_TAG: u8 = b's';

/// Key for an encoded text. The same text hashes differently as a query and as a snippet.
#[inline]
pub fn hash_text(text: &str, is_query: bool) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&[if is_query { QUERY_TAG } else { SNIPPET_TAG }]);
    hasher.update(text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Key for a jointly scored `(query, snippet)` pair.
///
/// The query is length-prefixed so `("ab", "c")` and `("a", "bc")` never collide.
#[inline]
pub fn hash_pair(query: &str, snippet: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(query.len() as u64).to_le_bytes());
    hasher.update(query.as_bytes());
    hasher.update(snippet.as_bytes());
    *hasher.finalize().as_bytes()
}
