//! Content store adapter traits.
//!
//! The content store is external to this crate. It is reached through three
//! narrow traits, one per concern:
//!
//! - [`RecordSource`]: full per-collection record fetch (indexing)
//! - [`VectorStore`]: similarity search and vector upsert
//! - [`KeywordMatcher`]: case-insensitive title substring search
//!
//! [`MemoryContentStore`](crate::memory::MemoryContentStore) implements all
//! three.

use async_trait::async_trait;
use vitrine_core::{Collection, ContentRecord, Result};

use crate::types::{SearchResult, StoredVector};

/// Reads every record of a collection.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// All records in `collection`, published or not.
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<ContentRecord>>;
}

/// Per-collection vector storage with similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Published records whose similarity to `query` is at least
    /// `min_similarity`, best first, at most `max_results`.
    ///
    /// Returns an empty list (not an error) when nothing clears the
    /// threshold. Ties keep the store's natural order.
    async fn similarity_search(
        &self,
        collection: Collection,
        query: &[f32],
        min_similarity: f32,
        max_results: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Overwrite the vector for a record, unconditionally.
    async fn upsert(&self, collection: Collection, id: &str, vector: StoredVector) -> Result<()>;

    /// Fingerprint of the stored vector for a record, if any.
    async fn fingerprint(&self, collection: Collection, id: &str) -> Result<Option<String>>;

    /// Persist buffered writes. Called once after a reindex batch.
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// The store name for diagnostics.
    fn name(&self) -> &str;
}

/// Title substring search.
#[async_trait]
pub trait KeywordMatcher: Send + Sync {
    /// Published records whose title contains `pattern`, ignoring case, at
    /// most `max_results`. Results carry no score.
    async fn substring_search(
        &self,
        collection: Collection,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>>;
}

/// Cosine similarity of two vectors.
///
/// Returns `None` for mismatched dimensions or a zero-length vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
