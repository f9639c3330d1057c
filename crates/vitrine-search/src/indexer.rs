//! Full reindex of every collection.
//!
//! The [`Indexer`] walks all four collections and, for every record
//! (published or not), normalizes its text, embeds it, and overwrites the
//! stored vector. Records are processed one at a time within a collection;
//! a record that fails to embed or store is logged and skipped.

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use vitrine_core::{Collection, ContentRecord, Error, Result};

use crate::embedding::EmbeddingProvider;
use crate::normalize::TextNormalizer;
use crate::store::{RecordSource, VectorStore};
use crate::types::{
    fingerprint, FreshnessCounts, FreshnessReport, IndexReport, PerCollection, StoredVector,
};

/// Recomputes stored vectors from current content.
pub struct Indexer {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    source: Arc<dyn RecordSource>,
    vectors: Arc<dyn VectorStore>,
    normalizer: TextNormalizer,
}

/// What happened to one collection during a reindex.
#[derive(Debug, Default, Clone, Copy)]
struct CollectionOutcome {
    attempted: usize,
    failed: usize,
}

impl Indexer {
    /// Create an indexer.
    ///
    /// `provider` is `None` when no embedding provider is configured;
    /// [`reindex_all`](Self::reindex_all) then refuses to run.
    pub fn new(
        provider: Option<Arc<dyn EmbeddingProvider>>,
        source: Arc<dyn RecordSource>,
        vectors: Arc<dyn VectorStore>,
        normalizer: TextNormalizer,
    ) -> Self {
        Self {
            provider,
            source,
            vectors,
            normalizer,
        }
    }

    /// Whether an embedding provider is available.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Re-embed every record in every collection.
    ///
    /// Fails only when no provider is configured, before any record is
    /// touched. Otherwise per-collection and per-record failures are logged
    /// and absorbed; the report counts records attempted.
    pub async fn reindex_all(&self) -> Result<IndexReport> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            Error::missing_precondition("no embedding provider configured (set embedding.api_key)")
        })?;

        let started = Instant::now();
        info!(
            "Reindexing all collections with provider '{}' into store '{}'",
            provider.name(),
            self.vectors.name()
        );

        let mut report = IndexReport::default();
        for collection in Collection::ALL {
            let outcome = self.reindex_collection(&**provider, collection).await;
            *report.indexed.get_mut(collection) = outcome.attempted;
            *report.failed.get_mut(collection) = outcome.failed;
        }

        if let Err(e) = self.vectors.flush().await {
            warn!("Failed to flush vector store '{}': {e}", self.vectors.name());
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Reindex complete: {} records ({} failed) in {}ms",
            report.indexed.total(),
            report.failed.total(),
            report.duration_ms
        );
        Ok(report)
    }

    async fn reindex_collection(
        &self,
        provider: &dyn EmbeddingProvider,
        collection: Collection,
    ) -> CollectionOutcome {
        let records = match self.source.fetch_all(collection).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Skipping {collection}: failed to fetch records: {e}");
                return CollectionOutcome::default();
            }
        };

        let mut outcome = CollectionOutcome::default();
        for record in &records {
            outcome.attempted += 1;
            if let Err(e) = self.reindex_record(provider, record).await {
                outcome.failed += 1;
                warn!("Skipping {collection}/{}: {e}", record.id);
            }
        }

        info!(
            "Indexed {collection}: {} attempted, {} failed",
            outcome.attempted, outcome.failed
        );
        outcome
    }

    async fn reindex_record(
        &self,
        provider: &dyn EmbeddingProvider,
        record: &ContentRecord,
    ) -> Result<()> {
        let text = self.normalizer.normalize(record);
        let vector = provider.embed(&text).await?;
        debug!(
            "Embedded {}/{} ({} chars, dim {})",
            record.collection,
            record.id,
            text.chars().count(),
            vector.len()
        );

        self.vectors
            .upsert(
                record.collection,
                &record.id,
                StoredVector::new(vector, fingerprint(&text)),
            )
            .await
    }

    /// Compare stored fingerprints against current content.
    ///
    /// Read-only: never calls the embedding provider, so it works without
    /// one configured.
    pub async fn check_freshness(&self) -> Result<FreshnessReport> {
        let mut report = PerCollection::<FreshnessCounts>::default();

        for collection in Collection::ALL {
            let counts = report.get_mut(collection);
            for record in self.source.fetch_all(collection).await? {
                let current = fingerprint(&self.normalizer.normalize(&record));
                match self.vectors.fingerprint(collection, &record.id).await? {
                    Some(stored) if stored == current => counts.fresh += 1,
                    Some(_) => counts.stale += 1,
                    None => counts.missing += 1,
                }
            }
            debug!("Freshness of {collection}: {counts:?}");
        }

        Ok(report)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{FailingEmbeddingProvider, MockEmbeddingProvider};
    use crate::memory::MemoryContentStore;
    use async_trait::async_trait;
    use vitrine_core::{Body, EmbeddingError};

    fn record(collection: Collection, id: &str, title: &str) -> ContentRecord {
        ContentRecord::new(collection, id, id, title)
    }

    fn sample_store() -> Arc<MemoryContentStore> {
        Arc::new(MemoryContentStore::from_records(vec![
            record(Collection::Project, "p-1", "Million Dollar Quartet"),
            record(Collection::Project, "p-2", "Guys and Dolls").with_published(false),
            record(Collection::Tutorial, "t-1", "Drafting a Ground Plan"),
            record(Collection::Article, "a-1", "Becoming a Scenic Designer"),
            record(Collection::News, "n-1", "Opening Night"),
            record(Collection::News, "n-2", "Season Announcement"),
        ]))
    }

    fn indexer(
        provider: Option<Arc<dyn EmbeddingProvider>>,
        store: Arc<MemoryContentStore>,
    ) -> Indexer {
        Indexer::new(provider, store.clone(), store, TextNormalizer::default())
    }

    /// Fails for any text containing `needle`, otherwise delegates to a mock.
    struct SelectiveProvider {
        needle: &'static str,
        inner: MockEmbeddingProvider,
    }

    #[async_trait]
    impl EmbeddingProvider for SelectiveProvider {
        async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            if text.contains(self.needle) {
                return Err(EmbeddingError::Provider {
                    status: 500,
                    message: "internal error".into(),
                });
            }
            self.inner.embed(text).await
        }

        fn name(&self) -> &str {
            "selective"
        }
    }

    /// A record source whose fetch fails for one collection.
    struct BrokenSource {
        broken: Collection,
        inner: Arc<MemoryContentStore>,
    }

    #[async_trait]
    impl RecordSource for BrokenSource {
        async fn fetch_all(&self, collection: Collection) -> Result<Vec<ContentRecord>> {
            if collection == self.broken {
                return Err(Error::store("connection lost"));
            }
            self.inner.fetch_all(collection).await
        }
    }

    // ------------------------------------------------------------------------
    // Precondition tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reindex_without_provider_is_missing_precondition() {
        let store = sample_store();
        let indexer = indexer(None, store.clone());
        assert!(!indexer.has_provider());

        let err = indexer.reindex_all().await.unwrap_err();
        assert!(err.is_missing_precondition());
        assert!(store.vector(Collection::Project, "p-1").await.is_none());
    }

    // ------------------------------------------------------------------------
    // Reindex tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reindex_all_counts_and_vectors() {
        let store = sample_store();
        let mock = Arc::new(MockEmbeddingProvider::new(8));
        let indexer = indexer(Some(mock.clone()), store.clone());

        let report = indexer.reindex_all().await.unwrap();

        assert_eq!(report.indexed.projects, 2);
        assert_eq!(report.indexed.tutorials, 1);
        assert_eq!(report.indexed.articles, 1);
        assert_eq!(report.indexed.news, 2);
        assert_eq!(report.failed.total(), 0);
        assert_eq!(mock.calls(), 6);

        for (collection, id) in [
            (Collection::Project, "p-1"),
            (Collection::Tutorial, "t-1"),
            (Collection::Article, "a-1"),
            (Collection::News, "n-2"),
        ] {
            let stored = store.vector(collection, id).await.unwrap();
            assert_eq!(stored.dimension(), 8);
        }
    }

    #[tokio::test]
    async fn test_reindex_includes_unpublished() {
        let store = sample_store();
        let indexer = indexer(Some(Arc::new(MockEmbeddingProvider::new(4))), store.clone());

        indexer.reindex_all().await.unwrap();
        assert!(store.vector(Collection::Project, "p-2").await.is_some());
    }

    #[tokio::test]
    async fn test_reindex_embeds_normalized_text() {
        let store = Arc::new(MemoryContentStore::from_records(vec![
            record(Collection::Tutorial, "t-1", "Lighting")
                .with_excerpt("Basics")
                .with_body(Body::Text("Use a gel.".into())),
        ]));
        let mock = Arc::new(
            MockEmbeddingProvider::new(2)
                .with_fixture("Lighting\nBasics\nUse a gel.", vec![0.0, 1.0]),
        );
        let indexer = indexer(Some(mock), store.clone());

        indexer.reindex_all().await.unwrap();
        let stored = store.vector(Collection::Tutorial, "t-1").await.unwrap();
        assert_eq!(stored.vector, vec![0.0, 1.0]);
        assert_eq!(stored.fingerprint, fingerprint("Lighting\nBasics\nUse a gel."));
    }

    #[tokio::test]
    async fn test_reindex_skips_failed_records_and_continues() {
        let store = sample_store();
        let provider = Arc::new(SelectiveProvider {
            needle: "Quartet",
            inner: MockEmbeddingProvider::new(4),
        });
        let indexer = indexer(Some(provider), store.clone());

        let report = indexer.reindex_all().await.unwrap();

        // Attempted count still includes the skipped record.
        assert_eq!(report.indexed.projects, 2);
        assert_eq!(report.failed.projects, 1);
        assert_eq!(report.failed.total(), 1);
        assert!(store.vector(Collection::Project, "p-1").await.is_none());
        assert!(store.vector(Collection::Project, "p-2").await.is_some());
        assert!(store.vector(Collection::News, "n-2").await.is_some());
    }

    #[tokio::test]
    async fn test_reindex_with_failing_provider_attempts_every_record() {
        let store = sample_store();
        let failing = Arc::new(FailingEmbeddingProvider::unreachable());
        let indexer = indexer(Some(failing.clone()), store);

        let report = indexer.reindex_all().await.unwrap();
        assert_eq!(report.indexed.total(), 6);
        assert_eq!(report.failed.total(), 6);
        assert_eq!(failing.calls(), 6);
    }

    #[tokio::test]
    async fn test_reindex_fetch_failure_reports_zero_for_collection() {
        let store = sample_store();
        let source = Arc::new(BrokenSource {
            broken: Collection::Article,
            inner: store.clone(),
        });
        let indexer = Indexer::new(
            Some(Arc::new(MockEmbeddingProvider::new(4))),
            source,
            store.clone(),
            TextNormalizer::default(),
        );

        let report = indexer.reindex_all().await.unwrap();
        assert_eq!(report.indexed.articles, 0);
        assert_eq!(report.indexed.projects, 2);
        assert_eq!(report.indexed.news, 2);
        assert!(store.vector(Collection::Article, "a-1").await.is_none());
    }

    #[tokio::test]
    async fn test_reindex_is_idempotent() {
        let store = sample_store();
        let indexer = indexer(Some(Arc::new(MockEmbeddingProvider::new(8))), store.clone());

        let first = indexer.reindex_all().await.unwrap();
        let first_vector = store.vector(Collection::News, "n-1").await.unwrap();
        let second = indexer.reindex_all().await.unwrap();
        let second_vector = store.vector(Collection::News, "n-1").await.unwrap();

        assert_eq!(first.indexed, second.indexed);
        assert_eq!(first_vector.vector, second_vector.vector);
        assert_eq!(first_vector.fingerprint, second_vector.fingerprint);
    }

    #[tokio::test]
    async fn test_reindex_flushes_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let store = Arc::new(MemoryContentStore::open(&path).unwrap());
        store
            .insert(record(Collection::Project, "p-1", "Million Dollar Quartet"))
            .await;

        let indexer = indexer(Some(Arc::new(MockEmbeddingProvider::new(4))), store);
        indexer.reindex_all().await.unwrap();

        let reopened = MemoryContentStore::open(&path).unwrap();
        assert!(reopened.vector(Collection::Project, "p-1").await.is_some());
    }

    // ------------------------------------------------------------------------
    // Freshness tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_check_freshness_before_and_after_reindex() {
        let store = sample_store();
        let indexer = indexer(Some(Arc::new(MockEmbeddingProvider::new(4))), store.clone());

        let before = indexer.check_freshness().await.unwrap();
        assert_eq!(before.projects.missing, 2);
        assert!(!before.news.is_fresh());

        indexer.reindex_all().await.unwrap();
        let after = indexer.check_freshness().await.unwrap();
        assert!(after.iter().all(|(_, counts)| counts.is_fresh()));
        assert_eq!(after.projects.fresh, 2);
    }

    #[tokio::test]
    async fn test_check_freshness_detects_edits() {
        let store = sample_store();
        let indexer = indexer(Some(Arc::new(MockEmbeddingProvider::new(4))), store.clone());
        indexer.reindex_all().await.unwrap();

        store
            .insert(record(Collection::News, "n-1", "Opening Night (Updated)"))
            .await;

        let report = indexer.check_freshness().await.unwrap();
        assert_eq!(report.news.stale, 1);
        assert_eq!(report.news.fresh, 1);
    }

    #[tokio::test]
    async fn test_check_freshness_without_provider() {
        let store = sample_store();
        let indexer = indexer(None, store);

        let report = indexer.check_freshness().await.unwrap();
        assert_eq!(report.news.missing, 2);
    }
}
