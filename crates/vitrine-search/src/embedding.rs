//! Embedding provider trait and test implementations.
//!
//! This module defines the `EmbeddingProvider` trait that abstracts over
//! the external text-embedding service.
//!
//! # Providers
//!
//! - `OpenAiEmbeddingProvider`: HTTP provider (see [`crate::openai`])
//! - `RetryingEmbeddingProvider`: backoff wrapper (see [`crate::retry`])
//! - `MockEmbeddingProvider`: Deterministic fixed-dimension vectors for testing
//! - `FailingEmbeddingProvider`: Always fails with a chosen error, for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use vitrine_core::EmbeddingError;

/// Trait for generating text embeddings.
///
/// One call embeds one text; no batching is assumed. Implementations must
/// keep "not configured" ([`EmbeddingError::MissingConfiguration`]) distinct
/// from failures of an attempted call, because the query router treats them
/// differently in its logs.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// The provider name for diagnostics.
    fn name(&self) -> &str;
}

/// A mock embedding provider for testing.
///
/// Generates deterministic vectors based on the input text bytes, producing
/// consistent embeddings for the same input. Specific texts can be pinned to
/// fixed vectors with [`with_fixture`](Self::with_fixture).
pub struct MockEmbeddingProvider {
    dimension: usize,
    fixtures: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl MockEmbeddingProvider {
    /// Create a new mock provider with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixtures: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Return `vector` whenever exactly `text` is embedded.
    pub fn with_fixture(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.fixtures.insert(text.into(), vector);
        self
    }

    /// The embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of `embed` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Generate a deterministic embedding from text.
    fn deterministic_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];
        let bytes = text.as_bytes();

        for (i, val) in embedding.iter_mut().enumerate() {
            let byte_val = if bytes.is_empty() {
                0u8
            } else {
                bytes[i % bytes.len()]
            };
            *val = ((byte_val as f32 + i as f32) % 256.0) / 256.0;
        }

        // Normalize to unit vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut embedding {
                *val /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fixtures.get(text) {
            Some(vector) => Ok(vector.clone()),
            None => Ok(self.deterministic_embedding(text)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A provider whose every call fails with the same error.
pub struct FailingEmbeddingProvider {
    error: EmbeddingError,
    calls: AtomicUsize,
}

impl FailingEmbeddingProvider {
    /// Fail every call with `error`.
    pub fn new(error: EmbeddingError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call as if the provider were unreachable.
    pub fn unreachable() -> Self {
        Self::new(EmbeddingError::Transport("connection refused".to_string()))
    }

    /// Number of `embed` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

// ============================================================================
// Tests
// ============================================================================
