//! Site build orchestration.
//!
//! Loads the corpus through the content store (one filesystem read), then
//! runs the generators against it in parallel.

use crate::{
    config::SiteConfig,
    content::ContentStore,
    generator::{data::export_data, rss::build_rss, sitemap::build_sitemap},
    log,
};
use anyhow::{Context, Result};
use std::fs;

/// Build the site: load content, write feed, sitemap and data exports.
pub fn build_site(config: &'static SiteConfig) -> Result<()> {
    let started = std::time::Instant::now();

    let store = ContentStore::new(config);

    // Load up front so a broken content tree fails before any output is
    // touched. Every generator below hits the same cached corpus.
    let corpus = store.corpus()?;
    for diagnostic in corpus.diagnostics() {
        log!("content"; "skipped {}: {}", diagnostic.path.display(), diagnostic.reason);
    }
    log!(
        "content";
        "{} items across {} types ({} skipped)",
        corpus.len(),
        store.get_content_types().len(),
        corpus.diagnostics().len()
    );

    let output = &config.build.output;
    if config.build.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clean {}", output.display()))?;
    }
    fs::create_dir_all(output).with_context(|| format!("Failed to create {}", output.display()))?;

    let (rss_result, (sitemap_result, data_result)) = rayon::join(
        || build_rss(config, &store),
        || {
            rayon::join(
                || build_sitemap(config, &store),
                || export_data(config, &store),
            )
        },
    );
    rss_result?;
    sitemap_result?;
    data_result?;

    log!("build"; "finished in {:.2?}", started.elapsed());
    Ok(())
}
