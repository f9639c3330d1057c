//! Content records and the collections they belong to.
//!
//! Records are authored elsewhere; Vitrine only reads them, embeds them, and
//! searches them. A record's body is either flat text or a sequence of
//! typed blocks as produced by a block editor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// One of the four content collections on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Design-portfolio items.
    Project,
    /// Tutorials.
    Tutorial,
    /// Long-form articles.
    Article,
    /// News posts.
    News,
}

impl Collection {
    /// All collections, in response order.
    pub const ALL: [Collection; 4] = [
        Collection::Project,
        Collection::Tutorial,
        Collection::Article,
        Collection::News,
    ];

    /// Plural key used on the wire (`projects`, `tutorials`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Tutorial => "tutorials",
            Self::Article => "articles",
            Self::News => "news",
        }
    }

    /// URL prefix under which records of this collection are served.
    pub fn route_prefix(&self) -> &'static str {
        match self {
            Self::Project => "/projects",
            Self::Tutorial => "/tutorials",
            Self::Article => "/articles",
            Self::News => "/news",
        }
    }

    /// Build the locator for a record slug in this collection.
    pub fn locator(&self, slug: &str) -> String {
        format!("{}/{}", self.route_prefix(), slug.trim_start_matches('/'))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "project" | "projects" => Ok(Self::Project),
            "tutorial" | "tutorials" => Ok(Self::Tutorial),
            "article" | "articles" => Ok(Self::Article),
            "news" => Ok(Self::News),
            other => Err(Error::invalid_data(format!("unknown collection: {other}"))),
        }
    }
}

/// A content block from a block-based editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// Paragraph of prose.
    Paragraph {
        /// Paragraph text.
        #[serde(default)]
        text: String,
    },
    /// Section heading.
    Heading {
        /// Heading text.
        #[serde(default)]
        text: String,
        /// Heading level (1-6).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
    },
    /// Block quote.
    Quote {
        /// Quoted text.
        #[serde(default)]
        text: String,
        /// Who said it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    /// Bulleted or numbered list.
    List {
        /// List items, in order.
        #[serde(default)]
        items: Vec<String>,
    },
    /// Image.
    Image {
        /// Image source.
        #[serde(default)]
        url: String,
        /// Alternative text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// Embedded media (video, map, ...).
    Embed {
        /// Embed source.
        #[serde(default)]
        url: String,
    },
    /// Any block type this crate does not know about.
    #[serde(other)]
    Other,
}

impl Block {
    /// Text carried by a textual block, `None` for images, embeds and
    /// unknown block types.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Paragraph { text } | Self::Heading { text, .. } | Self::Quote { text, .. } => {
                Some(text.clone())
            }
            Self::List { items } => Some(
                items
                    .iter()
                    .map(|item| item.trim())
                    .filter(|item| !item.is_empty())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Self::Image { .. } | Self::Embed { .. } | Self::Other => None,
        }
    }
}

/// A record body: flat text or typed blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Plain text or markdown.
    Text(String),
    /// Block editor output.
    Blocks(Vec<Block>),
}

/// A single piece of content in one of the four collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Stable identifier.
    pub id: String,

    /// URL slug, used to build the locator.
    pub slug: String,

    /// Display title.
    pub title: String,

    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Main body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,

    /// Collection this record belongs to.
    pub collection: Collection,

    /// Whether the record is publicly visible.
    #[serde(default)]
    pub published: bool,
}

impl ContentRecord {
    /// Create a published record with only a title.
    pub fn new(
        collection: Collection,
        id: impl Into<String>,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: title.into(),
            excerpt: None,
            body: None,
            collection,
            published: true,
        }
    }

    /// Set the excerpt.
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the publication flag.
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Locator of this record on the site.
    pub fn locator(&self) -> String {
        self.collection.locator(&self.slug)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Collection tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_collection_keys_and_locators() {
        assert_eq!(Collection::Project.key(), "projects");
        assert_eq!(Collection::News.key(), "news");
        assert_eq!(
            Collection::Article.locator("becoming-a-scenic-designer"),
            "/articles/becoming-a-scenic-designer"
        );
        assert_eq!(Collection::Tutorial.locator("/lighting"), "/tutorials/lighting");
    }

    #[test]
    fn test_collection_from_str() {
        assert_eq!("projects".parse::<Collection>().unwrap(), Collection::Project);
        assert_eq!("Tutorial".parse::<Collection>().unwrap(), Collection::Tutorial);
        assert_eq!(" news ".parse::<Collection>().unwrap(), Collection::News);
        assert!("podcasts".parse::<Collection>().is_err());
    }

    #[test]
    fn test_collection_all_order() {
        let keys: Vec<&str> = Collection::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["projects", "tutorials", "articles", "news"]);
    }

    // ------------------------------------------------------------------------
    // Block / Body tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_block_deserialization() {
        let json = r#"[
            {"type": "heading", "text": "Set design", "level": 2},
            {"type": "paragraph", "text": "A 1950s recording studio."},
            {"type": "image", "url": "https://cdn.example/set.jpg", "alt": "Set"},
            {"type": "carousel", "slides": []}
        ]"#;
        let blocks: Vec<Block> = serde_json::from_str(json).unwrap();

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].text().as_deref(), Some("Set design"));
        assert_eq!(blocks[1].text().as_deref(), Some("A 1950s recording studio."));
        assert!(blocks[2].text().is_none());
        assert_eq!(blocks[3], Block::Other);
    }

    #[test]
    fn test_textual_block_without_text_is_empty() {
        let json = r#"[
            {"type": "paragraph", "text": "a"},
            {"type": "paragraph", "children": []},
            {"type": "heading", "level": 2},
            {"type": "quote"},
            {"type": "image"}
        ]"#;
        let body: Body = serde_json::from_str(json).unwrap();
        let Body::Blocks(blocks) = body else {
            panic!("expected blocks");
        };

        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[1].text().as_deref(), Some(""));
        assert_eq!(
            blocks[2],
            Block::Heading {
                text: String::new(),
                level: Some(2)
            }
        );
        assert_eq!(blocks[3].text().as_deref(), Some(""));
        assert!(blocks[4].text().is_none());
    }

    #[test]
    fn test_record_with_partial_block_loads() {
        let json = r#"{
            "id": "a-1",
            "slug": "becoming-a-scenic-designer",
            "title": "Becoming a Scenic Designer",
            "collection": "articles",
            "published": true,
            "body": [{"type": "paragraph", "text": "a"}, {"type": "paragraph", "children": []}]
        }"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(record.body, Some(Body::Blocks(ref b)) if b.len() == 2));
    }

    #[test]
    fn test_list_block_text() {
        let block = Block::List {
            items: vec!["drafting".into(), "model building".into()],
        };
        assert_eq!(block.text().as_deref(), Some("drafting model building"));

        let block = Block::List {
            items: vec!["drafting".into(), " ".into(), "painting".into()],
        };
        assert_eq!(block.text().as_deref(), Some("drafting painting"));
    }

    #[test]
    fn test_body_untagged() {
        let text: Body = serde_json::from_str(r#""plain body""#).unwrap();
        assert_eq!(text, Body::Text("plain body".into()));

        let blocks: Body = serde_json::from_str(r#"[{"type": "quote", "text": "Less is more"}]"#)
            .unwrap();
        assert!(matches!(blocks, Body::Blocks(ref b) if b.len() == 1));
    }

    // ------------------------------------------------------------------------
    // ContentRecord tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_record_builder() {
        let record = ContentRecord::new(
            Collection::Project,
            "p-1",
            "million-dollar-quartet",
            "Million Dollar Quartet",
        )
        .with_excerpt("Scenic design")
        .with_published(false);

        assert_eq!(record.excerpt.as_deref(), Some("Scenic design"));
        assert!(!record.published);
        assert_eq!(record.locator(), "/projects/million-dollar-quartet");
    }

    #[test]
    fn test_record_deserialization_defaults() {
        let json = r#"{
            "id": "n-1",
            "slug": "opening-night",
            "title": "Opening Night",
            "collection": "news"
        }"#;
        let record: ContentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.collection, Collection::News);
        assert!(record.excerpt.is_none());
        assert!(record.body.is_none());
        assert!(!record.published);
    }
}
