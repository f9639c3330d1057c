//! Retry wrapper for embedding providers.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use log::warn;
use std::sync::Arc;
use std::time::Duration;
use vitrine_core::EmbeddingError;

use crate::embedding::EmbeddingProvider;

/// Wraps an embedding provider with bounded exponential backoff.
///
/// Only errors for which [`EmbeddingError::is_retryable`] holds are retried;
/// configuration and response-shape errors fail immediately.
pub struct RetryingEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryingEmbeddingProvider {
    /// Creates a new retry wrapper with default settings.
    ///
    /// Default settings:
    /// - Max retries: 3
    /// - Initial delay: 500 milliseconds
    /// - Max delay: 10 seconds
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner: provider,
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Sets the maximum number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for RetryingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries as usize);

        let inner = &self.inner;
        (|| async move { inner.embed(text).await })
            .retry(backoff)
            .when(EmbeddingError::is_retryable)
            .notify(|err: &EmbeddingError, delay: Duration| {
                warn!("Embedding call failed ({err}), retrying in {delay:?}");
            })
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
