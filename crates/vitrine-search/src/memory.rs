//! In-memory content store, optionally backed by a JSON snapshot file.
//!
//! Implements [`RecordSource`], [`VectorStore`] and [`KeywordMatcher`] over a
//! single ordered list of records. Store order is insertion order, which is
//! also the tie-break order for equal similarities.

use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use vitrine_core::{Collection, ContentRecord, Error, Result};

use crate::persistence::{load_snapshot, save_snapshot, Snapshot, StoredRecord, SNAPSHOT_VERSION};
use crate::store::{cosine_similarity, KeywordMatcher, RecordSource, VectorStore};
use crate::types::{SearchResult, StoredVector};

/// Content store held in memory.
pub struct MemoryContentStore {
    records: RwLock<Vec<StoredRecord>>,
    path: Option<PathBuf>,
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContentStore {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Create an in-memory store holding `records`, without vectors.
    pub fn from_records(records: impl IntoIterator<Item = ContentRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(StoredRecord::new).collect()),
            path: None,
        }
    }

    /// Open a file-backed store.
    ///
    /// A missing file yields an empty store that will be created on the
    /// first [`flush`](VectorStore::flush).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let snapshot = load_snapshot(&path)?;
            info!(
                "Loaded {} records from {}",
                snapshot.records.len(),
                path.display()
            );
            snapshot.records
        } else {
            debug!("No content snapshot at {}, starting empty", path.display());
            Vec::new()
        };

        Ok(Self {
            records: RwLock::new(records),
            path: Some(path),
        })
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert a record, or replace the content of an existing one.
    ///
    /// Replacing keeps the stored vector; it becomes stale until the next
    /// reindex.
    pub async fn insert(&self, record: ContentRecord) {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.record.collection == record.collection && r.record.id == record.id)
        {
            Some(existing) => existing.record = record,
            None => records.push(StoredRecord::new(record)),
        }
    }

    /// Remove a record. Returns whether it existed.
    pub async fn remove(&self, collection: Collection, id: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !(r.record.collection == collection && r.record.id == id));
        records.len() != before
    }

    /// Number of records across all collections.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// The stored vector for a record, if any.
    pub async fn vector(&self, collection: Collection, id: &str) -> Option<StoredVector> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.record.collection == collection && r.record.id == id)
            .and_then(|r| r.embedding.clone())
    }

    /// Write the current state to the backing file, if any.
    ///
    /// Serialization and file I/O run on the blocking pool.
    pub async fn save(&self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            records: self.records.read().await.clone(),
        };
        let count = snapshot.records.len();
        let target = path.clone();
        tokio::task::spawn_blocking(move || save_snapshot(&target, &snapshot))
            .await
            .map_err(|e| Error::operation(format!("spawn_blocking failed: {e}")))??;
        debug!("Saved {count} records to {}", path.display());
        Ok(())
    }
}

fn to_result(record: &ContentRecord, score: Option<f32>) -> SearchResult {
    SearchResult {
        id: record.id.clone(),
        title: record.title.clone(),
        locator: record.locator(),
        collection: record.collection,
        score,
    }
}

#[async_trait]
impl RecordSource for MemoryContentStore {
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<ContentRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.record.collection == collection)
            .map(|r| r.record.clone())
            .collect())
    }
}

#[async_trait]
impl VectorStore for MemoryContentStore {
    async fn similarity_search(
        &self,
        collection: Collection,
        query: &[f32],
        min_similarity: f32,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let records = self.records.read().await;

        let mut scored: Vec<(f32, &ContentRecord)> = records
            .iter()
            .filter(|r| r.record.collection == collection && r.record.published)
            .filter_map(|r| {
                let stored = r.embedding.as_ref()?;
                let similarity = cosine_similarity(query, &stored.vector)?;
                (similarity >= min_similarity).then_some((similarity, &r.record))
            })
            .collect();

        // Stable sort keeps store order for ties.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(max_results);

        Ok(scored
            .into_iter()
            .map(|(similarity, record)| to_result(record, Some(similarity)))
            .collect())
    }

    async fn upsert(&self, collection: Collection, id: &str, vector: StoredVector) -> Result<()> {
        let mut records = self.records.write().await;
        let entry = records
            .iter_mut()
            .find(|r| r.record.collection == collection && r.record.id == id)
            .ok_or_else(|| Error::not_found(format!("{collection}/{id}")))?;
        entry.embedding = Some(vector);
        Ok(())
    }

    async fn fingerprint(&self, collection: Collection, id: &str) -> Result<Option<String>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.record.collection == collection && r.record.id == id)
            .and_then(|r| r.embedding.as_ref().map(|e| e.fingerprint.clone())))
    }

    async fn flush(&self) -> Result<()> {
        self.save().await
    }

    fn name(&self) -> &str {
        if self.path.is_some() { "json-file" } else { "memory" }
    }
}

#[async_trait]
impl KeywordMatcher for MemoryContentStore {
    async fn substring_search(
        &self,
        collection: Collection,
        pattern: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let needle = pattern.to_lowercase();

        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.record.collection == collection && r.record.published)
            .filter(|r| r.record.title.to_lowercase().contains(&needle))
            .take(max_results)
            .map(|r| to_result(&r.record, None))
            .collect())
    }
}

impl std::fmt::Debug for MemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryContentStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
