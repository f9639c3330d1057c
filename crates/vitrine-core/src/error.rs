//! Error types for Vitrine operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Vitrine crates, plus [`EmbeddingError`] for the embedding provider
//! boundary. Uses `thiserror` for derive macros.
//!
//! Only two kinds of failure are meant to reach a caller of the query or
//! indexing entry points: [`Error::InvalidInput`] and
//! [`Error::MissingPrecondition`]. Everything else is absorbed below them.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in Vitrine operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific file.
    #[error("I/O error at {}: {source}", path.display())]
    IoWithPath {
        /// The underlying error.
        source: std::io::Error,
        /// The file being read or written.
        path: PathBuf,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Caller-supplied input was rejected before any work was done.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required precondition (e.g. a provider credential) is absent.
    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    /// Embedding provider failure.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Content store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Generic operation failure.
    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a missing precondition error.
    pub fn missing_precondition(msg: impl Into<String>) -> Self {
        Self::MissingPrecondition(msg.into())
    }

    /// Create a content store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a generic operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Wrap an I/O error with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Whether this error was caused by caller input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Whether this error reports an absent precondition.
    pub fn is_missing_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingPrecondition(_) | Self::Embedding(EmbeddingError::MissingConfiguration(_))
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using Vitrine's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the embedding provider boundary.
///
/// `MissingConfiguration` is known before any call is made; every other
/// variant is only known after a call was attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// No provider credential is configured.
    #[error("embedding provider not configured: {0}")]
    MissingConfiguration(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("embedding request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("embedding provider returned {status}: {message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The provider answered, but not with a usable vector.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}

impl EmbeddingError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Provider { status, .. } => *status == 429 || *status >= 500,
            Self::MissingConfiguration(_) | Self::InvalidResponse(_) => false,
        }
    }

    /// Whether this is the "no provider configured" case.
    pub fn is_missing_configuration(&self) -> bool {
        matches!(self, Self::MissingConfiguration(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
