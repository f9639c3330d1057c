//! Common types for the search and indexing modules.
//!
//! These types are shared by the query router, the indexer, and the store
//! adapters, and are what the HTTP layer serializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use vitrine_core::Collection;

// ============================================================================
// Per-collection container
// ============================================================================

/// One value per collection.
///
/// Every response and report in this crate carries exactly four slots, one
/// per [`Collection`]; this type makes that a structural guarantee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerCollection<T> {
    /// Design-portfolio items.
    pub projects: T,
    /// Tutorials.
    pub tutorials: T,
    /// Articles.
    pub articles: T,
    /// News posts.
    pub news: T,
}

impl<T> PerCollection<T> {
    /// Build by calling `f` once per collection, in [`Collection::ALL`] order.
    pub fn from_fn(mut f: impl FnMut(Collection) -> T) -> Self {
        Self {
            projects: f(Collection::Project),
            tutorials: f(Collection::Tutorial),
            articles: f(Collection::Article),
            news: f(Collection::News),
        }
    }

    /// The slot for `collection`.
    pub fn get(&self, collection: Collection) -> &T {
        match collection {
            Collection::Project => &self.projects,
            Collection::Tutorial => &self.tutorials,
            Collection::Article => &self.articles,
            Collection::News => &self.news,
        }
    }

    /// Mutable slot for `collection`.
    pub fn get_mut(&mut self, collection: Collection) -> &mut T {
        match collection {
            Collection::Project => &mut self.projects,
            Collection::Tutorial => &mut self.tutorials,
            Collection::Article => &mut self.articles,
            Collection::News => &mut self.news,
        }
    }

    /// Iterate `(collection, value)` pairs in [`Collection::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Collection, &T)> {
        Collection::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Transform every slot.
    pub fn map<U>(self, mut f: impl FnMut(Collection, T) -> U) -> PerCollection<U> {
        PerCollection {
            projects: f(Collection::Project, self.projects),
            tutorials: f(Collection::Tutorial, self.tutorials),
            articles: f(Collection::Article, self.articles),
            news: f(Collection::News, self.news),
        }
    }
}

impl PerCollection<usize> {
    /// Sum over all collections.
    pub fn total(&self) -> usize {
        self.projects + self.tutorials + self.articles + self.news
    }
}

// ============================================================================
// Search results
// ============================================================================

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Record identifier.
    pub id: String,

    /// Record title.
    pub title: String,

    /// Where the rendering layer should link to.
    pub locator: String,

    /// Collection the record belongs to.
    pub collection: Collection,

    /// Similarity to the query. Only set in semantic mode; comparable only
    /// within one collection of one response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Per-collection result lists.
pub type CollectionResults = PerCollection<Vec<SearchResult>>;

/// How a response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Vector similarity against stored embeddings.
    Semantic,
    /// Case-insensitive title substring match.
    Keyword,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Semantic => f.write_str("semantic"),
            Self::Keyword => f.write_str("keyword"),
        }
    }
}

/// A complete search response.
///
/// The variant *is* the mode: all four lists of a response come from the
/// same retrieval path. On the wire this is the flat object
/// `{ projects, tutorials, articles, news, mode }`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// Produced by similarity search.
    Semantic(CollectionResults),
    /// Produced by title substring search.
    Keyword(CollectionResults),
}

impl SearchResponse {
    /// The mode that produced this response.
    pub fn mode(&self) -> SearchMode {
        match self {
            Self::Semantic(_) => SearchMode::Semantic,
            Self::Keyword(_) => SearchMode::Keyword,
        }
    }

    /// The four result lists.
    pub fn results(&self) -> &CollectionResults {
        match self {
            Self::Semantic(results) | Self::Keyword(results) => results,
        }
    }

    /// Consume into the four result lists.
    pub fn into_results(self) -> CollectionResults {
        match self {
            Self::Semantic(results) | Self::Keyword(results) => results,
        }
    }

    /// Total hits across all collections.
    pub fn total(&self) -> usize {
        self.results().iter().map(|(_, list)| list.len()).sum()
    }
}

#[derive(Serialize)]
struct SearchResponseRef<'a> {
    #[serde(flatten)]
    results: &'a CollectionResults,
    mode: SearchMode,
}

#[derive(Deserialize)]
struct SearchResponseOwned {
    #[serde(flatten)]
    results: CollectionResults,
    mode: SearchMode,
}

impl Serialize for SearchResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SearchResponseRef {
            results: self.results(),
            mode: self.mode(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = SearchResponseOwned::deserialize(deserializer)?;
        Ok(match wire.mode {
            SearchMode::Semantic => Self::Semantic(wire.results),
            SearchMode::Keyword => Self::Keyword(wire.results),
        })
    }
}

// ============================================================================
// Stored vectors
// ============================================================================

/// An embedding as written by the indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVector {
    /// The embedding vector.
    pub vector: Vec<f32>,

    /// BLAKE3 hex digest of the normalized text that was embedded.
    pub fingerprint: String,

    /// When the vector was written.
    pub indexed_at: DateTime<Utc>,
}

impl StoredVector {
    /// Create a stored vector stamped with the current time.
    pub fn new(vector: Vec<f32>, fingerprint: impl Into<String>) -> Self {
        Self {
            vector,
            fingerprint: fingerprint.into(),
            indexed_at: Utc::now(),
        }
    }

    /// The embedding dimension.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Fingerprint of a normalized text.
pub fn fingerprint(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

// ============================================================================
// Indexing reports
// ============================================================================

/// Outcome of a full reindex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexReport {
    /// Records attempted per collection.
    pub indexed: PerCollection<usize>,

    /// Records skipped after an embed or upsert failure.
    pub failed: PerCollection<usize>,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Vector freshness for one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessCounts {
    /// Vector matches the current normalized text.
    pub fresh: usize,
    /// Vector was computed from different text.
    pub stale: usize,
    /// No vector stored.
    pub missing: usize,
}

impl FreshnessCounts {
    /// Whether every record has an up-to-date vector.
    pub fn is_fresh(&self) -> bool {
        self.stale == 0 && self.missing == 0
    }
}

/// Vector freshness across all collections.
pub type FreshnessReport = PerCollection<FreshnessCounts>;

// ============================================================================
// Tests
// ============================================================================
