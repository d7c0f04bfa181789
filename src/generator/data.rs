//! JSON data exports.
//!
//! Route-layer collaborators render pages from these files instead of
//! re-reading the content tree:
//!
//! | File | Contents |
//! |------|----------|
//! | `_data/pages.json` | every item's metadata + url, default sort |
//! | `_data/tags.json`  | global tag → count map |
//! | `search-index.json` | slim records for client-side search |
//!
//! Bodies are deliberately excluded - rendering is not this program's job,
//! and search only needs titles, summaries and tags.

use super::EXPORT_PAGE_SIZE;
use crate::{
    config::SiteConfig,
    content::{ContentItem, ContentQuery, ContentStore, ItemMeta},
    log,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

// ============================================================================
// Export Records
// ============================================================================

/// One entry in `pages.json`: full metadata, no body.
#[derive(Debug, Serialize)]
struct PageRecord<'a> {
    content_type: &'a str,
    slug: &'a str,
    url: String,
    meta: &'a ItemMeta,
}

/// One entry in `search-index.json`: just enough to match and link.
#[derive(Debug, Serialize)]
struct SearchRecord<'a> {
    content_type: &'a str,
    slug: &'a str,
    url: String,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
}

/// serde `skip_serializing_if` helper for borrowed tag slices.
fn slice_is_empty(tags: &[String]) -> bool {
    tags.is_empty()
}

impl<'a> PageRecord<'a> {
    fn from_item(item: &'a ContentItem) -> Self {
        Self {
            content_type: &item.content_type,
            slug: &item.slug,
            url: item.url_path(),
            meta: &item.meta,
        }
    }
}

impl<'a> SearchRecord<'a> {
    fn from_item(item: &'a ContentItem) -> Self {
        Self {
            content_type: &item.content_type,
            slug: &item.slug,
            url: item.url_path(),
            title: &item.meta.title,
            summary: item.meta.summary.as_deref(),
            tags: &item.meta.tags,
            date: item.meta.date.as_deref(),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Write the JSON data exports into the output directory.
pub fn export_data(config: &'static SiteConfig, store: &ContentStore) -> Result<()> {
    let result = store.get_content(&ContentQuery {
        page_size: Some(EXPORT_PAGE_SIZE),
        ..Default::default()
    })?;

    let data_dir = config.build.output.join(&config.build.data);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let pages: Vec<_> = result.items.iter().map(PageRecord::from_item).collect();
    write_json(&data_dir.join("pages.json"), &pages)?;

    let tags = store.get_all_tag_counts()?;
    write_json(&data_dir.join("tags.json"), &tags)?;

    if config.build.search.enable {
        let records: Vec<_> = result.items.iter().map(SearchRecord::from_item).collect();
        let search_path = config.build.output.join(&config.build.search.path);
        write_json(&search_path, &records)?;
    }

    Ok(())
}

/// Serialize a value to pretty JSON and write it.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    log!("data"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
    Ok(())
}
