//! Configuration for the Vitrine CLI and server.
//!
//! Provides the [`VitrineConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `VITRINE_CONFIG` environment variable
//! 3. XDG default: `~/.config/vitrine/config.toml`
//! 4. Built-in defaults
//!
//! `VITRINE_<SECTION>_<KEY>` environment variables overlay any section key,
//! e.g. `VITRINE_EMBEDDING_API_KEY` or `VITRINE_SERVER_PORT`. Numeric keys
//! are parsed from their string form.

use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vitrine_core::traits::ConfigProvider;
use vitrine_core::{Error, Result};
use vitrine_search::config::number_or_string;
use vitrine_search::{EmbeddingConfig, NormalizerConfig, SearchConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "VITRINE_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for Vitrine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VitrineConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Content store configuration.
    pub store: StoreConfig,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Query-time settings.
    pub search: SearchConfig,

    /// Normalized-text bounds.
    pub normalizer: NormalizerConfig,

    /// Server configuration.
    pub server: ServerConfig,
}

/// Content store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot backing the content store.
    pub path: String,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,

    /// Host address to bind to.
    pub host: String,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            project_name: "vitrine".to_string(),
            store: StoreConfig::default(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
            normalizer: NormalizerConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "vitrine-content.json".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl VitrineConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("VITRINE");
        env_opts.add_section("store");
        env_opts.add_section("embedding");
        env_opts.add_section("search");
        env_opts.add_section("normalizer");
        env_opts.add_section("server");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vitrine").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Like [`to_toml_string`](Self::to_toml_string) with the API key masked.
    pub fn to_redacted_toml_string(&self) -> Result<String> {
        let mut redacted = self.clone();
        if redacted.embedding.api_key.is_some() {
            redacted.embedding.api_key = Some("<redacted>".to_string());
        }
        redacted.to_toml_string()
    }

    /// Flatten this config into environment variable pairs with `VITRINE_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "VITRINE", &mut vars);
        Ok(vars)
    }

    /// The `host:port` the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for VitrineConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn store_path(&self) -> Result<PathBuf> {
        let path = PathBuf::from(&self.store.path);
        if path.is_absolute() {
            return Ok(path);
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(|e| Error::config(format!("Could not determine store path: {e}")))
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
