//! Query-time entry point.
//!
//! The [`QueryRouter`] picks a retrieval mode per query and fans out to all
//! four collections concurrently:
//!
//! 1. A blank query is rejected with [`Error::InvalidInput`].
//! 2. With no provider, or when embedding the query fails, every collection
//!    is searched by title substring and the response is [`SearchResponse::Keyword`].
//! 3. Otherwise every collection is searched by similarity and the response
//!    is [`SearchResponse::Semantic`].
//!
//! A failing collection contributes an empty list; it never cancels the
//! other three or changes the response mode.

use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use vitrine_core::{Collection, Error, Result};

use crate::config::SearchConfig;
use crate::embedding::EmbeddingProvider;
use crate::normalize::{truncate_chars, DEFAULT_MAX_CHARS};
use crate::store::{KeywordMatcher, VectorStore};
use crate::types::{CollectionResults, PerCollection, SearchMode, SearchResponse, SearchResult};

/// Routes queries to semantic or keyword search.
pub struct QueryRouter {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    vectors: Arc<dyn VectorStore>,
    keywords: Arc<dyn KeywordMatcher>,
    config: SearchConfig,
    max_query_chars: usize,
}

impl QueryRouter {
    /// Create a router.
    ///
    /// `provider` is `None` when no embedding provider is configured, in
    /// which case every query runs in keyword mode.
    pub fn new(
        provider: Option<Arc<dyn EmbeddingProvider>>,
        vectors: Arc<dyn VectorStore>,
        keywords: Arc<dyn KeywordMatcher>,
        config: SearchConfig,
    ) -> Self {
        Self {
            provider,
            vectors,
            keywords,
            config,
            max_query_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Bound the query text sent to the provider.
    pub fn with_max_query_chars(mut self, max_chars: usize) -> Self {
        self.max_query_chars = max_chars;
        self
    }

    /// The active search settings.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Whether an embedding provider is available.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Search all collections.
    ///
    /// Errors only for a blank query. Provider and store failures degrade
    /// the response instead of failing it.
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_input("query must not be empty"));
        }
        let query = truncate_chars(query, self.max_query_chars);

        let response = match self.embed_query(query).await {
            Some(vector) => SearchResponse::Semantic(self.semantic_fan_out(&vector).await),
            None => SearchResponse::Keyword(self.keyword_fan_out(query).await),
        };

        debug!(
            "Query {query:?} answered in {} mode with {} results",
            response.mode(),
            response.total()
        );
        Ok(response)
    }

    /// Embed the query, or `None` to fall back to keyword mode.
    async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
        let Some(provider) = &self.provider else {
            debug!("No embedding provider configured, using keyword search");
            return None;
        };

        match provider.embed(query).await {
            Ok(vector) => Some(vector),
            Err(e) if e.is_missing_configuration() => {
                debug!("Embedding provider not configured ({e}), using keyword search");
                None
            }
            Err(e) => {
                warn!(
                    "Embedding provider '{}' failed ({e}), falling back to keyword search",
                    provider.name()
                );
                None
            }
        }
    }

    async fn semantic_fan_out(&self, vector: &[f32]) -> CollectionResults {
        let SearchConfig {
            min_similarity,
            max_results,
        } = self.config;

        fan_out(SearchMode::Semantic, |collection| {
            self.vectors
                .similarity_search(collection, vector, min_similarity, max_results)
        })
        .await
    }

    async fn keyword_fan_out(&self, query: &str) -> CollectionResults {
        let max_results = self.config.max_results;

        fan_out(SearchMode::Keyword, |collection| {
            self.keywords.substring_search(collection, query, max_results)
        })
        .await
    }
}

/// Run one search per collection concurrently and wait for all four.
async fn fan_out<F, Fut>(mode: SearchMode, search: F) -> CollectionResults
where
    F: Fn(Collection) -> Fut,
    Fut: Future<Output = Result<Vec<SearchResult>>>,
{
    let (projects, tutorials, articles, news) = tokio::join!(
        isolate(mode, Collection::Project, search(Collection::Project)),
        isolate(mode, Collection::Tutorial, search(Collection::Tutorial)),
        isolate(mode, Collection::Article, search(Collection::Article)),
        isolate(mode, Collection::News, search(Collection::News)),
    );

    PerCollection {
        projects,
        tutorials,
        articles,
        news,
    }
}

/// Map one collection's failure to an empty list.
async fn isolate<Fut>(mode: SearchMode, collection: Collection, search: Fut) -> Vec<SearchResult>
where
    Fut: Future<Output = Result<Vec<SearchResult>>>,
{
    match search.await {
        Ok(results) => results,
        Err(e) => {
            warn!("{mode} search of {collection} failed, returning no results: {e}");
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
