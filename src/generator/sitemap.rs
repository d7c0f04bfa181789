//! Sitemap generation.
//!
//! Emits one `<url>` entry per static page, type listing page, content
//! item, and tag page.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>daily</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use super::{EXPORT_PAGE_SIZE, parse_date};
use crate::{
    config::SiteConfig,
    content::{ContentQuery, ContentStore},
    log,
};
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Build sitemap if enabled in config.
pub fn build_sitemap(config: &'static SiteConfig, store: &ContentStore) -> Result<()> {
    if config.build.sitemap.enable {
        let sitemap = Sitemap::build(config, store)?;
        sitemap.write(config)?;
    }
    Ok(())
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD format)
    lastmod: String,
    /// Suggested crawl frequency
    changefreq: &'static str,
    /// Relative crawl priority
    priority: &'static str,
}

impl Sitemap {
    /// Collect entries for the home page, type listings, items and tags.
    fn build(config: &'static SiteConfig, store: &ContentStore) -> Result<Self> {
        let base = config.base_url();
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut urls = Vec::new();

        // Home page
        urls.push(UrlEntry {
            loc: format!("{base}/"),
            lastmod: today.clone(),
            changefreq: "daily",
            priority: "1.0",
        });

        // Type listing pages
        for key in store.get_content_types() {
            urls.push(UrlEntry {
                loc: format!("{base}/{key}"),
                lastmod: today.clone(),
                changefreq: "daily",
                priority: "0.9",
            });
        }

        // Content detail pages; undated items fall back to the build date
        let result = store.get_content(&ContentQuery {
            page_size: Some(EXPORT_PAGE_SIZE),
            ..Default::default()
        })?;
        for item in &result.items {
            let lastmod = item
                .meta
                .date
                .as_deref()
                .and_then(parse_date)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| today.clone());
            urls.push(UrlEntry {
                loc: format!("{base}{}", item.url_path()),
                lastmod,
                changefreq: "weekly",
                priority: "0.8",
            });
        }

        // Tag pages
        for tag in store.get_all_tags()? {
            urls.push(UrlEntry {
                loc: format!("{base}/tags/{}", urlencoding::encode(&tag)),
                lastmod: today.clone(),
                changefreq: "weekly",
                priority: "0.6",
            });
        }

        Ok(Self { urls })
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.changefreq
            ));
            xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to output file.
    fn write(self, config: &'static SiteConfig) -> Result<()> {
        let sitemap_path = config.build.output.join(&config.build.sitemap.path);
        let xml = self.into_xml();

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&sitemap_path, &xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
