//! The query engine.
//!
//! One operation: [`Corpus::query`]. The stages run in a fixed order -
//! type filter, tag filter, text filter, sort, paginate - because the
//! order is what makes results reproducible across every consumer (pages,
//! feed, sitemap, exports).
//!
//! # Sort semantics
//!
//! - `sort_by`/`sort_order` fall back to the content type's configured
//!   default, then to the global `[content.defaults]` sort.
//! - Items missing the sort field go last under BOTH directions.
//! - Ties keep corpus insertion order (`sort_by` is a stable sort).

use super::{corpus::Corpus, item::ContentItem};
use crate::config::{SortField, SortOrder};
use anyhow::{Result, bail};
use serde::Serialize;
use std::cmp::Ordering;

// ============================================================================
// Query Types
// ============================================================================

/// A single query request. Constructed per call, no identity.
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    /// Restrict to one content type. Unknown keys yield an empty result.
    pub content_type: Option<String>,
    /// 1-based page number; out-of-range values clamp, they never error.
    pub page: Option<usize>,
    /// Items per page. Defaults to `[content.defaults].page_size`.
    pub page_size: Option<usize>,
    /// Case-insensitive substring filter over title and summary.
    pub text: Option<String>,
    /// Tag filter with AND semantics: items must carry every listed tag.
    pub tags: Vec<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

/// Pagination metadata of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    /// Post-filter, pre-pagination count
    pub total_items: usize,
    pub total_pages: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

/// One page of query results.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult {
    pub items: Vec<ContentItem>,
    pub pagination: Pagination,
}

// ============================================================================
// Query Execution
// ============================================================================

impl Corpus {
    /// Run a query: filter, sort, paginate.
    ///
    /// The only error is a zero `page_size`; everything else - unknown
    /// type, out-of-range page, no matches - resolves to a well-formed
    /// (possibly empty) result.
    pub fn query(&self, q: &ContentQuery) -> Result<PaginatedResult> {
        let page_size = q.page_size.unwrap_or(self.default_page_size());
        if page_size == 0 {
            bail!("page_size must be at least 1");
        }

        // 1. type filter
        let mut selected: Vec<&ContentItem> = match q.content_type.as_deref() {
            Some(key) => self.type_items(key).collect(),
            None => self.items().iter().collect(),
        };

        // 2. tag filter (AND semantics)
        if !q.tags.is_empty() {
            selected.retain(|item| {
                q.tags
                    .iter()
                    .all(|wanted| item.meta.tags.iter().any(|tag| tag == wanted))
            });
        }

        // 3. free-text filter
        if let Some(text) = q.text.as_deref().filter(|text| !text.is_empty()) {
            let needle = text.to_lowercase();
            selected.retain(|item| {
                item.meta.title.to_lowercase().contains(&needle)
                    || item
                        .meta
                        .summary
                        .as_deref()
                        .is_some_and(|summary| summary.to_lowercase().contains(&needle))
            });
        }

        // 4. stable sort
        let spec = self.sort_spec_for(q.content_type.as_deref());
        let field = q.sort_by.unwrap_or(spec.field);
        let order = q.sort_order.unwrap_or(spec.order);
        selected.sort_by(|a, b| compare_keys(sort_key(a, field), sort_key(b, field), order));

        // 5. paginate, clamping the page into range
        let total_items = selected.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = q.page.unwrap_or(1).clamp(1, total_pages);

        let items = selected
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        Ok(PaginatedResult {
            items,
            pagination: Pagination {
                page,
                page_size,
                total_items,
                total_pages,
                has_prev_page: page > 1,
                has_next_page: page < total_pages,
            },
        })
    }
}

/// Extract the sort key for one item. `None` means "missing".
fn sort_key<'a>(item: &'a ContentItem, field: SortField) -> Option<&'a str> {
    match field {
        SortField::Date => item.meta.date.as_deref(),
        SortField::Title => Some(item.meta.title.as_str()),
        SortField::Author => item.meta.author.as_deref(),
        SortField::Slug => Some(item.slug.as_str()),
    }
}

/// Compare two optional sort keys.
///
/// Missing keys sort after present ones regardless of direction; the
/// direction only flips comparisons between present keys.
fn compare_keys(a: Option<&str>, b: Option<&str>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(b),
            SortOrder::Desc => b.cmp(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentConfig, ContentTypeConfig, SortSpec};
    use crate::content::frontmatter::FrontMatter;
    use crate::content::reader::RawRecord;
    use std::path::PathBuf;

    struct ItemSpec {
        type_key: &'static str,
        slug: &'static str,
        title: &'static str,
        summary: Option<&'static str>,
        date: Option<&'static str>,
        tags: &'static [&'static str],
    }

    impl ItemSpec {
        fn new(type_key: &'static str, slug: &'static str, title: &'static str) -> Self {
            Self {
                type_key,
                slug,
                title,
                summary: None,
                date: None,
                tags: &[],
            }
        }

        fn date(mut self, date: &'static str) -> Self {
            self.date = Some(date);
            self
        }

        fn summary(mut self, summary: &'static str) -> Self {
            self.summary = Some(summary);
            self
        }

        fn tags(mut self, tags: &'static [&'static str]) -> Self {
            self.tags = tags;
            self
        }
    }

    fn corpus_of(specs: Vec<ItemSpec>) -> Corpus {
        let mut content = ContentConfig::default();
        for key in ["articles", "stories"] {
            content.types.push(ContentTypeConfig {
                key: key.into(),
                name: key.into(),
                ..Default::default()
            });
        }
        // stories sort by title ascending, like the reference deployment
        content.types[1].sort = Some(SortSpec {
            field: crate::config::SortField::Title,
            order: SortOrder::Asc,
        });

        let records = specs
            .into_iter()
            .map(|spec| RawRecord {
                type_key: spec.type_key.into(),
                slug: spec.slug.into(),
                path: PathBuf::from(format!("{}/{}.md", spec.type_key, spec.slug)),
                matter: FrontMatter {
                    title: Some(spec.title.into()),
                    summary: spec.summary.map(Into::into),
                    date: spec.date.map(Into::into),
                    tags: spec.tags.iter().map(|t| (*t).to_string()).collect(),
                    ..Default::default()
                },
                body: String::new(),
            })
            .collect();

        Corpus::build(records, vec![], &content)
    }

    fn ten_dated_articles() -> Corpus {
        corpus_of(
            (1..=10)
                .map(|n| {
                    let slug: &'static str = Box::leak(format!("item-{n:02}").into_boxed_str());
                    let title: &'static str = Box::leak(format!("Item {n:02}").into_boxed_str());
                    let date: &'static str = Box::leak(format!("2024-01-{n:02}").into_boxed_str());
                    ItemSpec::new("articles", slug, title).date(date)
                })
                .collect(),
        )
    }

    fn slugs(result: &PaginatedResult) -> Vec<&str> {
        result.items.iter().map(|item| item.slug.as_str()).collect()
    }

    #[test]
    fn test_last_partial_page() {
        // 10 items, page_size 3, page 4 → the 10th item alone
        let corpus = ten_dated_articles();
        let result = corpus
            .query(&ContentQuery {
                page: Some(4),
                page_size: Some(3),
                sort_order: Some(SortOrder::Asc),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(slugs(&result), vec!["item-10"]);
        assert_eq!(result.pagination.total_items, 10);
        assert_eq!(result.pagination.total_pages, 4);
        assert!(result.pagination.has_prev_page);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn test_page_clamps_high() {
        // page 99 on a 2-page corpus returns page 2's content
        let corpus = corpus_of(
            (0..4)
                .map(|n| {
                    let slug: &'static str = Box::leak(format!("s{n}").into_boxed_str());
                    ItemSpec::new("articles", slug, "T")
                })
                .collect(),
        );
        let result = corpus
            .query(&ContentQuery {
                page: Some(99),
                page_size: Some(3),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(result.pagination.page, 2);
        assert_eq!(result.items.len(), 1);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn test_page_clamps_low() {
        let corpus = ten_dated_articles();
        let result = corpus
            .query(&ContentQuery {
                page: Some(0),
                page_size: Some(3),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(result.pagination.page, 1);
        assert!(!result.pagination.has_prev_page);
    }

    #[test]
    fn test_zero_page_size_is_error() {
        let corpus = ten_dated_articles();
        let err = corpus
            .query(&ContentQuery {
                page_size: Some(0),
                ..Default::default()
            })
            .unwrap_err();

        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_empty_corpus_pagination() {
        let corpus = corpus_of(vec![]);
        let result = corpus.query(&ContentQuery::default()).unwrap();

        assert_eq!(result.pagination.total_items, 0);
        assert_eq!(result.pagination.total_pages, 1);
        assert_eq!(result.pagination.page, 1);
        assert!(!result.pagination.has_prev_page);
        assert!(!result.pagination.has_next_page);
    }

    #[test]
    fn test_unknown_type_yields_empty_result() {
        let corpus = ten_dated_articles();
        let result = corpus
            .query(&ContentQuery {
                content_type: Some("podcasts".into()),
                ..Default::default()
            })
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.pagination.total_items, 0);
        assert_eq!(result.pagination.total_pages, 1);
    }

    #[test]
    fn test_tag_filter_is_conjunctive() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "ab", "AB").tags(&["a", "b"]),
            ItemSpec::new("articles", "a", "A").tags(&["a"]),
            ItemSpec::new("articles", "bc", "BC").tags(&["b", "c"]),
        ]);

        let both = corpus
            .query(&ContentQuery {
                tags: vec!["a".into(), "b".into()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(slugs(&both), vec!["ab"]);

        // conjunctive: result ⊆ each single-tag result
        for tag in ["a", "b"] {
            let single = corpus
                .query(&ContentQuery {
                    tags: vec![tag.into()],
                    ..Default::default()
                })
                .unwrap();
            let single_slugs = slugs(&single);
            for slug in slugs(&both) {
                assert!(single_slugs.contains(&slug));
            }
        }
    }

    #[test]
    fn test_text_filter_matches_summary_only() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "hit", "Unrelated Title")
                .summary("the quick brown fox jumps"),
            ItemSpec::new("articles", "miss", "Another Title").summary("nothing to see"),
        ]);

        let result = corpus
            .query(&ContentQuery {
                text: Some("Quick Brown".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(slugs(&result), vec!["hit"]);
    }

    #[test]
    fn test_text_filter_case_insensitive_title() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "hit", "On PATIENCE"),
            ItemSpec::new("articles", "miss", "On Haste"),
        ]);

        let result = corpus
            .query(&ContentQuery {
                text: Some("patience".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(slugs(&result), vec!["hit"]);
    }

    #[test]
    fn test_sort_missing_field_last_both_directions() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "undated-1", "U1"),
            ItemSpec::new("articles", "old", "Old").date("2023-01-01"),
            ItemSpec::new("articles", "undated-2", "U2"),
            ItemSpec::new("articles", "new", "New").date("2024-01-01"),
        ]);

        for (order, dated) in [
            (SortOrder::Desc, ["new", "old"]),
            (SortOrder::Asc, ["old", "new"]),
        ] {
            let result = corpus
                .query(&ContentQuery {
                    sort_by: Some(SortField::Date),
                    sort_order: Some(order),
                    ..Default::default()
                })
                .unwrap();

            // dated items first in the requested direction, then the
            // undated ones in insertion order
            assert_eq!(
                slugs(&result),
                vec![dated[0], dated[1], "undated-1", "undated-2"]
            );
        }
    }

    #[test]
    fn test_sort_ties_keep_insertion_order() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "first", "Same").date("2024-01-01"),
            ItemSpec::new("articles", "second", "Same").date("2024-01-01"),
            ItemSpec::new("articles", "third", "Same").date("2024-01-01"),
        ]);

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let result = corpus
                .query(&ContentQuery {
                    sort_order: Some(order),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(slugs(&result), vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_type_default_sort_applies() {
        // stories default to title ascending (set in corpus_of)
        let corpus = corpus_of(vec![
            ItemSpec::new("stories", "zebra", "Zebra"),
            ItemSpec::new("stories", "apple", "Apple"),
        ]);

        let result = corpus
            .query(&ContentQuery {
                content_type: Some("stories".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(slugs(&result), vec!["apple", "zebra"]);
    }

    #[test]
    fn test_query_sort_overrides_type_default() {
        let corpus = corpus_of(vec![
            ItemSpec::new("stories", "zebra", "Zebra"),
            ItemSpec::new("stories", "apple", "Apple"),
        ]);

        let result = corpus
            .query(&ContentQuery {
                content_type: Some("stories".into()),
                sort_by: Some(SortField::Title),
                sort_order: Some(SortOrder::Desc),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(slugs(&result), vec!["zebra", "apple"]);
    }

    #[test]
    fn test_repeated_queries_identical() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "a", "A").date("2024-01-01").tags(&["x"]),
            ItemSpec::new("articles", "b", "B").date("2024-01-01").tags(&["x"]),
            ItemSpec::new("stories", "c", "C").tags(&["x"]),
        ]);
        let query = ContentQuery {
            tags: vec!["x".into()],
            page_size: Some(2),
            ..Default::default()
        };

        let first = corpus.query(&query).unwrap();
        let second = corpus.query(&query).unwrap();

        assert_eq!(slugs(&first), slugs(&second));
        assert_eq!(first.pagination, second.pagination);
    }

    #[test]
    fn test_result_bounds() {
        let corpus = ten_dated_articles();
        for page in 1..=5 {
            let result = corpus
                .query(&ContentQuery {
                    page: Some(page),
                    page_size: Some(4),
                    ..Default::default()
                })
                .unwrap();
            assert!(result.items.len() <= result.pagination.page_size);
            assert!(result.items.len() <= result.pagination.total_items);
            assert_eq!(result.pagination.total_pages, 3);
        }
    }

    #[test]
    fn test_filters_compose() {
        let corpus = corpus_of(vec![
            ItemSpec::new("articles", "match", "Fox Tales")
                .date("2024-02-01")
                .tags(&["nature", "essay"]),
            ItemSpec::new("articles", "wrong-tag", "Fox Tales Too").tags(&["essay"]),
            ItemSpec::new("stories", "wrong-type", "Fox Story").tags(&["nature", "essay"]),
            ItemSpec::new("articles", "wrong-text", "Owl Tales")
                .date("2024-01-01")
                .tags(&["nature", "essay"]),
        ]);

        let result = corpus
            .query(&ContentQuery {
                content_type: Some("articles".into()),
                tags: vec!["nature".into(), "essay".into()],
                text: Some("fox".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(slugs(&result), vec!["match"]);
    }
}
