//! Text normalization for embedding.
//!
//! Collapses a [`ContentRecord`] into one bounded plain-text string: title,
//! then excerpt, then body. Block bodies contribute only their textual
//! blocks. Truncation is applied last, on a character boundary.

use vitrine_core::{Body, ContentRecord};

/// Default upper bound on normalized text, in characters.
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Composes the text that gets embedded for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextNormalizer {
    max_chars: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl TextNormalizer {
    /// Create a normalizer bounded to `max_chars` characters.
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// The configured bound.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Normalize a record.
    ///
    /// Segments are joined with a newline. A missing excerpt or body still
    /// contributes its (empty) segment.
    pub fn normalize(&self, record: &ContentRecord) -> String {
        let excerpt = record.excerpt.as_deref().unwrap_or_default();
        let body = record.body.as_ref().map(body_text).unwrap_or_default();

        let text = [record.title.as_str(), excerpt, body.as_str()].join("\n");
        truncate_chars(&text, self.max_chars).to_string()
    }
}

/// Flatten a body into plain text.
///
/// Blank textual blocks are dropped so the remaining ones are separated by
/// exactly one space.
fn body_text(body: &Body) -> String {
    match body {
        Body::Text(text) => text.clone(),
        Body::Blocks(blocks) => blocks
            .iter()
            .filter_map(|block| block.text())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Truncate to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// Tests
// ============================================================================
