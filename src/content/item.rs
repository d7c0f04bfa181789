//! Content item types.
//!
//! `ContentItem` is the unit every query, feed and export works with.
//! `(content_type, slug)` is unique across the corpus; items are immutable
//! once the corpus is built.

use serde::Serialize;
use std::collections::BTreeMap;

/// Published metadata of one content item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemMeta {
    /// Item title (always present; loading rejects untitled files)
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Publication date as ISO 8601 string (e.g., "2024-01-15")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Cover image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Audio file URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    /// Tags in front-matter order, duplicates removed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Type-specific fields (e.g., a story's `virtue`)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, toml::Value>,
}

/// One published content unit.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// Key of the owning content type (e.g., "articles")
    pub content_type: String,

    /// URL-safe identifier, unique within the content type
    pub slug: String,

    pub meta: ItemMeta,

    /// Raw body text. Rendering happens elsewhere, never here.
    pub content: String,
}

impl ContentItem {
    /// Site-relative URL path for this item (e.g., `/articles/on-patience`).
    pub fn url_path(&self) -> String {
        format!("/{}/{}", self.content_type, self.slug)
    }
}

/// A `(content_type, slug)` pair, used to pre-enumerate detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugEntry {
    pub content_type: String,
    pub slug: String,
}
