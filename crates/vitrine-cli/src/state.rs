//! Shared application state.
//!
//! [`AppState`] wires the content store, query router and indexer from a
//! loaded [`VitrineConfig`]. It is `Clone` (all fields are `Arc`s) and is
//! handed to every HTTP handler.

use log::{info, warn};
use std::sync::Arc;
use vitrine_core::traits::ConfigProvider;
use vitrine_core::Result;
use vitrine_search::{
    EmbeddingConfig, EmbeddingProvider, Indexer, MemoryContentStore, OpenAiEmbeddingProvider,
    QueryRouter, RetryingEmbeddingProvider, TextNormalizer,
};

use crate::config::VitrineConfig;

/// Thread-safe shared application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<VitrineConfig>,
    store: Arc<MemoryContentStore>,
    router: Arc<QueryRouter>,
    indexer: Arc<Indexer>,
}

impl AppState {
    /// Build from configuration, opening the file-backed content store.
    pub fn from_config(config: VitrineConfig) -> Result<Self> {
        let store = Arc::new(MemoryContentStore::open(config.store_path()?)?);
        let provider = embedding_provider(&config.embedding);
        Ok(Self::with_store(config, store, provider))
    }

    /// Build around an existing store and provider.
    ///
    /// The indexer's provider is wrapped for retries when
    /// `embedding.max_retries` is non-zero; the query path never retries.
    pub fn with_store(
        config: VitrineConfig,
        store: Arc<MemoryContentStore>,
        provider: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        let normalizer = TextNormalizer::new(config.normalizer.max_chars);

        let router = QueryRouter::new(
            provider.clone(),
            store.clone(),
            store.clone(),
            config.search,
        )
        .with_max_query_chars(normalizer.max_chars());

        let index_provider = provider.map(|p| with_retries(p, config.embedding.max_retries));
        let indexer = Indexer::new(index_provider, store.clone(), store.clone(), normalizer);

        Self {
            config: Arc::new(config),
            store,
            router: Arc::new(router),
            indexer: Arc::new(indexer),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &VitrineConfig {
        &self.config
    }

    /// The content store.
    pub fn store(&self) -> &Arc<MemoryContentStore> {
        &self.store
    }

    /// The query router.
    pub fn router(&self) -> &QueryRouter {
        &self.router
    }

    /// The indexer.
    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }
}

/// Construct the configured embedding provider, if any.
pub fn embedding_provider(config: &EmbeddingConfig) -> Option<Arc<dyn EmbeddingProvider>> {
    match OpenAiEmbeddingProvider::from_config(config) {
        Ok(provider) => {
            info!(
                "Embedding provider: {} (model {})",
                provider.name(),
                config.model
            );
            Some(Arc::new(provider))
        }
        Err(e) if e.is_missing_configuration() => {
            info!("No embedding provider configured; search will use keyword matching");
            None
        }
        Err(e) => {
            warn!("Embedding provider unavailable ({e}); search will use keyword matching");
            None
        }
    }
}

fn with_retries(
    provider: Arc<dyn EmbeddingProvider>,
    max_retries: u32,
) -> Arc<dyn EmbeddingProvider> {
    if max_retries == 0 {
        return provider;
    }
    Arc::new(RetryingEmbeddingProvider::new(provider).with_max_retries(max_retries))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_search::MockEmbeddingProvider;

    #[test]
    fn test_embedding_provider_absent_without_key() {
        assert!(embedding_provider(&EmbeddingConfig::default()).is_none());
    }

    #[test]
    fn test_embedding_provider_present_with_key() {
        let config = EmbeddingConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let provider = embedding_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_with_retries_wraps_only_when_enabled() {
        let mock: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(4));
        assert_eq!(with_retries(mock.clone(), 0).name(), "mock");
        assert_eq!(with_retries(mock, 3).name(), "mock");
    }

    #[test]
    fn test_with_store_without_provider() {
        let state = AppState::with_store(
            VitrineConfig::default(),
            Arc::new(MemoryContentStore::new()),
            None,
        );
        assert!(!state.router().has_provider());
        assert!(!state.indexer().has_provider());
        assert_eq!(state.config().server.port, 3000);
    }

    #[test]
    fn test_from_config_opens_missing_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = VitrineConfig::default();
        config.store.path = dir.path().join("content.json").to_string_lossy().into_owned();

        let state = AppState::from_config(config).unwrap();
        assert!(state.store().path().is_some());
        assert!(!state.router().has_provider());
    }

    #[test]
    fn test_app_state_send_sync_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<AppState>();
    }
}
