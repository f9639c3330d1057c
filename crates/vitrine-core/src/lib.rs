//! Vitrine Core — shared content model and error types.
//!
//! This crate provides the foundational types used across all Vitrine crates.
//! It has no internal Vitrine dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`content`]: Collections and the content records they hold
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction

pub mod content;
pub mod error;
pub mod traits;

// Re-export key types at crate root for convenience
pub use content::{Block, Body, Collection, ContentRecord};
pub use error::{EmbeddingError, Error, Result};
pub use traits::ConfigProvider;
