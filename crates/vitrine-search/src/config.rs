//! Configuration for embedding, search, and normalization.
//!
//! These sections are embedded in the application config and are always
//! available. Every field has a serde default so partial files load.
//!
//! Numeric fields also accept numeric strings, which is how environment
//! overlays deliver them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::normalize::DEFAULT_MAX_CHARS;

// ============================================================================
// Embedding
// ============================================================================

/// Embedding provider configuration.
///
/// An absent or blank `api_key` means no provider is configured: search
/// runs in keyword mode and reindexing is refused.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider credential.
    pub api_key: Option<String>,

    /// API base URL (without the `/embeddings` suffix).
    pub base_url: String,

    /// Embedding model name.
    pub model: String,

    /// Requested output dimension, if the model supports shortening.
    #[serde(deserialize_with = "optional_number_or_string")]
    pub dimensions: Option<usize>,

    /// Per-request timeout in seconds.
    #[serde(deserialize_with = "number_or_string")]
    pub timeout_secs: u64,

    /// Retries for transient failures during indexing (0 disables).
    #[serde(deserialize_with = "number_or_string")]
    pub max_retries: u32,
}

impl EmbeddingConfig {
    /// The trimmed credential, if one is set.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Whether a provider credential is present.
    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: None,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

// ============================================================================
// Search
// ============================================================================

/// Query-time tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum similarity for a semantic hit.
    #[serde(deserialize_with = "number_or_string")]
    pub min_similarity: f32,

    /// Maximum hits per collection.
    #[serde(deserialize_with = "number_or_string")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.3,
            max_results: 5,
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Normalized-text bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Maximum characters of text sent to the provider.
    #[serde(deserialize_with = "number_or_string")]
    pub max_chars: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

// ============================================================================
// Numeric fields from strings
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

/// Deserialize a number, or a string holding one.
///
/// Use with `#[serde(deserialize_with = "...")]` on numeric config fields
/// that environment variables may override.
pub fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}"))),
    }
}

/// Like [`number_or_string`] for optional fields; a blank string is `None`.
pub fn optional_number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
