//! rss feed generation.
//!
//! Serializes the dated part of the corpus into an RSS 2.0 feed, newest
//! first, with one `<category>` per tag.

use super::{EXPORT_PAGE_SIZE, parse_date};
use crate::{
    config::{SiteConfig, SortField, SortOrder},
    content::{ContentItem, ContentQuery, ContentStore},
    log,
};
use anyhow::{Ok, Result, anyhow};
use regex::Regex;
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, sync::LazyLock};

// ============================================================================
// Public API
// ============================================================================

/// Build rss feed if enabled in config.
pub fn build_rss(config: &'static SiteConfig, store: &ContentStore) -> Result<()> {
    if config.build.rss.enable {
        RssFeed::build(config, store)?.write(config)?;
    }
    Ok(())
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// rss feed builder
struct RssFeed<'a> {
    config: &'a SiteConfig,
    items: Vec<ContentItem>,
}

impl<'a> RssFeed<'a> {
    /// Query the store for every dated item, newest first.
    ///
    /// Undated items cannot carry a `pubDate` and are skipped.
    fn build(config: &'a SiteConfig, store: &ContentStore) -> Result<Self> {
        let result = store.get_content(&ContentQuery {
            page_size: Some(EXPORT_PAGE_SIZE),
            sort_by: Some(SortField::Date),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        })?;

        // date-desc sort puts undated items last, so this keeps the order
        let items = result
            .items
            .into_iter()
            .filter(|item| item.meta.date.is_some())
            .collect();

        Ok(Self { config, items })
    }

    /// Generate rss xml string
    fn into_xml(self) -> Result<String> {
        let items: Vec<_> = self
            .items
            .iter()
            .filter_map(|item| item_to_rss(item, self.config))
            .collect();

        let channel = ChannelBuilder::default()
            .title(self.config.base.title.clone())
            .link(self.config.base.url.clone().unwrap_or_default())
            .description(self.config.base.description.clone())
            .language(self.config.base.language.clone())
            .generator("curio".to_string())
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    /// Write rss feed to file
    fn write(self, config: &SiteConfig) -> Result<()> {
        let xml = self.into_xml()?;
        let rss_path = config.build.output.join(&config.build.rss.path);

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&rss_path, &xml)?;

        log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a content item to an rss item.
/// Returns None if the date is missing or unparseable.
fn item_to_rss(item: &ContentItem, config: &SiteConfig) -> Option<rss::Item> {
    let date = item.meta.date.as_deref()?;
    let pub_date = parse_date(date)?.to_rfc2822();
    let link = format!("{}{}", config.base_url(), item.url_path());
    let author = normalize_rss_author(item.meta.author.as_ref(), config);

    let categories: Vec<_> = item
        .meta
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
        .collect();

    Some(
        ItemBuilder::default()
            .title(item.meta.title.clone())
            .link(Some(link.clone()))
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(item.meta.summary.clone())
            .pub_date(pub_date)
            .author(author)
            .categories(categories)
            .build(),
    )
}

/// Normalize author field to rss format: "email@example.com (Name)"
///
/// Priority:
/// 1. Item author if already in valid format
/// 2. Site config author if in valid format
/// 3. Combine site config email and author
fn normalize_rss_author(author: Option<&String>, config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = author?;

    // Check if item author is already valid
    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.clone());
    }

    // Try site config author
    let site_author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(site_author) {
        return Some(site_author.clone());
    }

    // Combine email and author name
    Some(format!("{} ({})", config.base.email, site_author))
}
