//! `[content]` section configuration.
//!
//! Declares the content root, query defaults, and the content type table.
//! Content types are configuration rows, not code: adding a category to a
//! site means adding a `[[content.types]]` entry, nothing else.
//!
//! # Example
//!
//! ```toml
//! [content]
//! root = "content"
//!
//! [content.defaults]
//! page_size = 9
//!
//! [[content.types]]
//! key = "articles"
//! name = "Article"
//!
//! [[content.types]]
//! key = "stories"
//! name = "Story"
//! required_fields = ["title", "virtue"]
//! sort = { field = "title", order = "asc" }
//! ```

use super::{defaults, error::ConfigError};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

// ============================================================================
// Sort Specification
// ============================================================================

/// Front-matter field a query can sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Title,
    Author,
    Slug,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A field/direction pair, used for per-type and global sort defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    #[serde(default)]
    pub field: SortField,

    #[serde(default)]
    pub order: SortOrder,
}

// ============================================================================
// Content Types
// ============================================================================

/// Feature flags for one content type.
///
/// These drive presentation collaborators (cards, detail pages); the engine
/// itself only consults `tags` and `search` indirectly through queries.
#[derive(Debug, Clone, Copy, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TypeFeatures {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub images: bool,

    #[serde(default = "defaults::r#false")]
    pub audio: bool,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub tags: bool,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub search: bool,

    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub pagination: bool,
}

/// One `[[content.types]]` row - a named content category.
///
/// Declaration order in curio.toml is the corpus insertion order across
/// types, so it is part of the site's observable behavior.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentTypeConfig {
    /// Type key, used in URLs and queries (e.g., "articles").
    pub key: String,

    /// Singular display name (e.g., "Article").
    pub name: String,

    /// Plural display name. Defaults to `name` + "s".
    #[serde(default)]
    pub name_plural: Option<String>,

    /// Source directory under the content root. Defaults to the key.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Front-matter fields that must be present for an item to load.
    /// `title` is always required regardless of this list.
    #[serde(default = "defaults::content::required_fields")]
    #[educe(Default = defaults::content::required_fields())]
    pub required_fields: Vec<String>,

    /// Default sort for queries against this type.
    /// Falls back to `[content.defaults].sort` when unset.
    #[serde(default)]
    pub sort: Option<SortSpec>,

    #[serde(default)]
    pub features: TypeFeatures,
}

impl ContentTypeConfig {
    /// Plural display name, derived from `name` when not configured.
    pub fn plural_name(&self) -> String {
        self.name_plural
            .clone()
            .unwrap_or_else(|| format!("{}s", self.name))
    }

    /// Source directory relative to the content root.
    pub fn source_dir(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.key))
    }
}

// ============================================================================
// Content Section
// ============================================================================

/// `[content.defaults]` - query defaults shared by every type.
#[derive(Debug, Clone, Copy, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentDefaults {
    /// Page size used when a query does not specify one.
    #[serde(default = "defaults::content::page_size")]
    #[educe(Default = defaults::content::page_size())]
    pub page_size: usize,

    /// Global default sort, used when neither the query nor the type
    /// configures one.
    #[serde(default)]
    pub sort: SortSpec,
}

/// `[content]` section in curio.toml.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Root directory holding one subdirectory per content type.
    #[serde(default = "defaults::content::root")]
    #[educe(Default = defaults::content::root())]
    pub root: PathBuf,

    #[serde(default)]
    pub defaults: ContentDefaults,

    #[serde(default)]
    pub types: Vec<ContentTypeConfig>,
}

impl ContentConfig {
    /// Registered type keys, in declaration order.
    pub fn type_keys(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.key.as_str()).collect()
    }

    /// Whether `key` names a registered content type.
    pub fn is_valid_type(&self, key: &str) -> bool {
        self.types.iter().any(|t| t.key == key)
    }

    /// Look up a type's configuration row.
    pub fn get(&self, key: &str) -> Option<&ContentTypeConfig> {
        self.types.iter().find(|t| t.key == key)
    }

    /// Resolve the sort spec for a type: the type's own default when set,
    /// otherwise the global `[content.defaults]` sort.
    pub fn sort_for(&self, key: Option<&str>) -> SortSpec {
        key.and_then(|k| self.get(k))
            .and_then(|t| t.sort)
            .unwrap_or(self.defaults.sort)
    }

    /// Validate the content table: non-empty unique keys, usable page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.page_size == 0 {
            return Err(ConfigError::Validation(
                "[content.defaults.page_size] must be at least 1".into(),
            ));
        }

        let mut seen = HashSet::new();
        for t in &self.types {
            if t.key.is_empty() {
                return Err(ConfigError::Validation(
                    "[[content.types]] entry with empty key".into(),
                ));
            }
            if t.key.contains('/') || t.key.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "content type key `{}` must be a URL path segment",
                    t.key
                )));
            }
            if !seen.insert(t.key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate content type key `{}`",
                    t.key
                )));
            }
        }

        Ok(())
    }
}
