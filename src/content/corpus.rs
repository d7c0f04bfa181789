//! Content index builder.
//!
//! Normalizes raw records into [`ContentItem`]s and builds the secondary
//! indexes the query engine and tag aggregator run against:
//!
//! | Index     | Key           | Value                        |
//! |-----------|---------------|------------------------------|
//! | `by_type` | type key      | item indices, insertion order |
//! | `by_tag`  | tag           | item indices, insertion order |
//!
//! Sort order is deliberately NOT baked in here: different queries request
//! different sort specs against the same index, so sorting is the query
//! engine's job.

use super::{
    error::LoadError,
    item::{ContentItem, ItemMeta, SlugEntry},
    reader::{self, Diagnostic, RawRecord},
};
use crate::config::{ContentConfig, SiteConfig, SortSpec};
use std::collections::BTreeMap;

/// The loaded, indexed content corpus.
///
/// Immutable once built; every query, feed and export for one cache
/// generation sees exactly this data.
#[derive(Debug)]
pub struct Corpus {
    /// All items, in (type declaration, filename) insertion order
    items: Vec<ContentItem>,
    /// Type key → indices into `items`
    by_type: BTreeMap<String, Vec<usize>>,
    /// Tag → indices into `items`
    by_tag: BTreeMap<String, Vec<usize>>,
    /// Files skipped during reading/indexing
    diagnostics: Vec<Diagnostic>,
    /// Query defaults resolved from configuration at build time
    default_page_size: usize,
    default_sort: SortSpec,
    type_sorts: BTreeMap<String, SortSpec>,
}

impl Corpus {
    /// Read the content tree and build the corpus.
    pub fn load(config: &SiteConfig) -> Result<Self, LoadError> {
        let (records, diagnostics) = reader::read_all(config)?;
        Ok(Self::build(records, diagnostics, &config.content))
    }

    /// Index raw records into a corpus.
    ///
    /// Records whose type key is not registered are dropped with a
    /// diagnostic; everything else becomes a [`ContentItem`].
    pub fn build(
        records: Vec<RawRecord>,
        mut diagnostics: Vec<Diagnostic>,
        content: &ContentConfig,
    ) -> Self {
        // Every registered type gets an entry, so a valid-but-empty type
        // and an unknown type are distinguishable in the index.
        let mut by_type: BTreeMap<String, Vec<usize>> = content
            .types
            .iter()
            .map(|t| (t.key.clone(), Vec::new()))
            .collect();
        let mut by_tag: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut items = Vec::with_capacity(records.len());

        for record in records {
            let Some(type_list) = by_type.get_mut(&record.type_key) else {
                diagnostics.push(Diagnostic {
                    path: record.path,
                    reason: format!("unregistered content type `{}`", record.type_key),
                });
                continue;
            };
            let Some(title) = record.matter.title else {
                // The reader already rejects untitled files; records built
                // by other callers get the same treatment
                diagnostics.push(Diagnostic {
                    path: record.path,
                    reason: "missing required field `title`".into(),
                });
                continue;
            };

            // Tags count once per item: drop duplicates, keep first-seen order
            let mut tags = record.matter.tags;
            let mut seen = std::collections::HashSet::new();
            tags.retain(|tag| seen.insert(tag.clone()));

            let index = items.len();
            type_list.push(index);
            for tag in &tags {
                by_tag.entry(tag.clone()).or_default().push(index);
            }

            items.push(ContentItem {
                content_type: record.type_key,
                slug: record.slug,
                meta: ItemMeta {
                    title,
                    summary: record.matter.summary,
                    date: record.matter.date,
                    author: record.matter.author,
                    image: record.matter.image,
                    audio: record.matter.audio,
                    tags,
                    extra: record.matter.extra,
                },
                content: record.body,
            });
        }

        Self {
            items,
            by_type,
            by_tag,
            diagnostics,
            default_page_size: content.defaults.page_size,
            default_sort: content.defaults.sort,
            type_sorts: content
                .types
                .iter()
                .filter_map(|t| t.sort.map(|spec| (t.key.clone(), spec)))
                .collect(),
        }
    }

    /// All items in corpus insertion order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Files skipped while loading this corpus.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Items of one type, insertion order. Empty for unknown types.
    pub(super) fn type_items(&self, key: &str) -> impl Iterator<Item = &ContentItem> {
        self.by_type
            .get(key)
            .into_iter()
            .flatten()
            .map(|&index| &self.items[index])
    }

    /// Item indices carrying `tag`, corpus insertion order.
    pub(super) fn tag_index(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.by_tag
    }

    /// Detail lookup. `None` is the routine "drives the not-found page"
    /// outcome, not an error.
    pub fn get_by_slug(&self, type_key: &str, slug: &str) -> Option<&ContentItem> {
        self.type_items(type_key).find(|item| item.slug == slug)
    }

    /// Every `(content_type, slug)` pair, corpus insertion order.
    pub fn slug_entries(&self) -> Vec<SlugEntry> {
        self.items
            .iter()
            .map(|item| SlugEntry {
                content_type: item.content_type.clone(),
                slug: item.slug.clone(),
            })
            .collect()
    }

    /// Items carrying `tag`, corpus insertion order.
    pub fn items_with_tag(&self, tag: &str) -> Vec<&ContentItem> {
        self.by_tag
            .get(tag)
            .into_iter()
            .flatten()
            .map(|&index| &self.items[index])
            .collect()
    }

    /// Resolved sort spec: type default when set, global default otherwise.
    pub fn sort_spec_for(&self, type_key: Option<&str>) -> SortSpec {
        type_key
            .and_then(|key| self.type_sorts.get(key))
            .copied()
            .unwrap_or(self.default_sort)
    }

    /// Page size used when a query does not specify one.
    pub fn default_page_size(&self) -> usize {
        self.default_page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentConfig, ContentTypeConfig};
    use std::path::PathBuf;

    fn content_config(keys: &[&str]) -> ContentConfig {
        let mut content = ContentConfig::default();
        for key in keys {
            content.types.push(ContentTypeConfig {
                key: (*key).into(),
                name: (*key).into(),
                ..Default::default()
            });
        }
        content
    }

    fn record(type_key: &str, slug: &str, title: &str, tags: &[&str]) -> RawRecord {
        RawRecord {
            type_key: type_key.into(),
            slug: slug.into(),
            path: PathBuf::from(format!("content/{type_key}/{slug}.md")),
            matter: crate::content::frontmatter::FrontMatter {
                title: Some(title.into()),
                tags: tags.iter().map(|t| (*t).to_string()).collect(),
                ..Default::default()
            },
            body: String::new(),
        }
    }

    #[test]
    fn test_build_indexes() {
        let content = content_config(&["articles", "stories"]);
        let corpus = Corpus::build(
            vec![
                record("articles", "one", "One", &["a", "b"]),
                record("stories", "two", "Two", &["a"]),
            ],
            vec![],
            &content,
        );

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.type_items("articles").count(), 1);
        assert_eq!(corpus.type_items("stories").count(), 1);
        assert_eq!(corpus.items_with_tag("a").len(), 2);
        assert_eq!(corpus.items_with_tag("b").len(), 1);
    }

    #[test]
    fn test_unregistered_type_dropped_with_diagnostic() {
        let content = content_config(&["articles"]);
        let corpus = Corpus::build(
            vec![
                record("articles", "ok", "Ok", &[]),
                record("podcasts", "nope", "Nope", &[]),
            ],
            vec![],
            &content,
        );

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.diagnostics().len(), 1);
        assert!(corpus.diagnostics()[0].reason.contains("podcasts"));
    }

    #[test]
    fn test_registered_empty_type_has_index_entry() {
        let content = content_config(&["articles", "stories"]);
        let corpus = Corpus::build(vec![record("articles", "one", "One", &[])], vec![], &content);

        // valid-but-empty type iterates as empty, same as unknown, but the
        // index entry exists
        assert_eq!(corpus.type_items("stories").count(), 0);
        assert!(corpus.by_type.contains_key("stories"));
        assert!(!corpus.by_type.contains_key("podcasts"));
    }

    #[test]
    fn test_duplicate_tags_deduped_in_order() {
        let content = content_config(&["articles"]);
        let corpus = Corpus::build(
            vec![record("articles", "one", "One", &["b", "a", "b", "a"])],
            vec![],
            &content,
        );

        assert_eq!(corpus.items()[0].meta.tags, vec!["b", "a"]);
        assert_eq!(corpus.items_with_tag("b").len(), 1);
    }

    #[test]
    fn test_get_by_slug() {
        let content = content_config(&["articles", "stories"]);
        let corpus = Corpus::build(
            vec![
                record("articles", "shared", "Article", &[]),
                record("stories", "shared", "Story", &[]),
            ],
            vec![],
            &content,
        );

        // same slug in two types resolves independently
        assert_eq!(
            corpus.get_by_slug("articles", "shared").unwrap().meta.title,
            "Article"
        );
        assert_eq!(
            corpus.get_by_slug("stories", "shared").unwrap().meta.title,
            "Story"
        );
        assert!(corpus.get_by_slug("articles", "missing").is_none());
        assert!(corpus.get_by_slug("podcasts", "shared").is_none());
    }

    #[test]
    fn test_slug_entries_round_trip() {
        let content = content_config(&["articles", "stories"]);
        let corpus = Corpus::build(
            vec![
                record("articles", "one", "One", &[]),
                record("articles", "two", "Two", &[]),
                record("stories", "three", "Three", &[]),
            ],
            vec![],
            &content,
        );

        let entries = corpus.slug_entries();
        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert!(
                corpus
                    .get_by_slug(&entry.content_type, &entry.slug)
                    .is_some()
            );
        }
    }
}
