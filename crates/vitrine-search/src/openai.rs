//! OpenAI-compatible embedding provider.
//!
//! Talks to any service exposing `POST {base_url}/embeddings` with the
//! OpenAI request and response shapes.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use vitrine_core::EmbeddingError;

use crate::config::EmbeddingConfig;
use crate::embedding::EmbeddingProvider;

/// Embedding provider backed by an OpenAI-compatible HTTP API.
pub struct OpenAiEmbeddingProvider {
    api_key: String,
    model: String,
    base_url: String,
    dimensions: Option<usize>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingProvider {
    /// Creates a new provider against the public OpenAI endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Provider API key
    /// * `model` - Model ID (e.g., "text-embedding-3-small")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: EmbeddingConfig::default().base_url,
            dimensions: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build from configuration.
    ///
    /// Fails with [`EmbeddingError::MissingConfiguration`] when no credential
    /// is set, before any network activity.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let api_key = config.credential().ok_or_else(|| {
            EmbeddingError::MissingConfiguration("embedding.api_key is not set".to_string())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            dimensions: config.dimensions,
            client,
        })
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request a specific output dimension.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        if let Some(dimensions) = self.dimensions {
            body["dimensions"] = serde_json::json!(dimensions);
        }

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding in response".into()))?;

        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse("empty embedding".into()));
        }

        Ok(embedding)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
