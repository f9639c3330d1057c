//! Content discovery for Vitrine.
//!
//! This crate answers free-text queries across the four content collections
//! and keeps the stored vectors behind semantic search in step with content.
//! Semantic search is used whenever an embedding provider is configured and
//! reachable; otherwise every collection falls back to title substring
//! matching.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     vitrine-search                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  QueryRouter (mode selection + 4-way fan-out)               │
//! │  Indexer (normalize → embed → upsert, freshness check)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider trait                                    │
//! │  ├── OpenAiEmbeddingProvider (HTTP)                         │
//! │  ├── RetryingEmbeddingProvider (backoff wrapper)            │
//! │  └── MockEmbeddingProvider / FailingEmbeddingProvider       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RecordSource / VectorStore / KeywordMatcher traits         │
//! │  └── MemoryContentStore (in-memory, JSON snapshot)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TextNormalizer                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitrine_search::{MemoryContentStore, QueryRouter, SearchConfig};
//!
//! let store = Arc::new(MemoryContentStore::open("vitrine-content.json")?);
//! let router = QueryRouter::new(None, store.clone(), store, SearchConfig::default());
//!
//! let response = router.search("quartet").await?;
//! println!("{} results ({} mode)", response.total(), response.mode());
//! ```

// Leaves
pub mod config;
pub mod embedding;
pub mod normalize;
pub mod types;

// Embedding providers
pub mod openai;
pub mod retry;

// Content store
pub mod memory;
pub mod persistence;
pub mod store;

// Orchestration
pub mod indexer;
pub mod router;

// Re-exports — types
pub use types::{
    fingerprint, CollectionResults, FreshnessCounts, FreshnessReport, IndexReport, PerCollection,
    SearchMode, SearchResponse, SearchResult, StoredVector,
};

// Re-exports — configuration
pub use config::{EmbeddingConfig, NormalizerConfig, SearchConfig};

// Re-exports — embedding
pub use embedding::{EmbeddingProvider, FailingEmbeddingProvider, MockEmbeddingProvider};
pub use openai::OpenAiEmbeddingProvider;
pub use retry::RetryingEmbeddingProvider;

// Re-exports — store
pub use memory::MemoryContentStore;
pub use store::{cosine_similarity, KeywordMatcher, RecordSource, VectorStore};

// Re-exports — orchestration
pub use indexer::Indexer;
pub use normalize::TextNormalizer;
pub use router::QueryRouter;
