//! Site initialization module.
//!
//! Creates new site structure with default configuration and one sample
//! item per content type.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "curio.toml";

/// Default configuration written by `curio init`.
const CONFIG_TEMPLATE: &str = r#"[base]
title = "Directory"
description = "A directory of articles and stories"
# author = "Your Name"
# email = "you@example.com"
url = "https://your-domain.com"

[content]
root = "content"

[content.defaults]
page_size = 9

[[content.types]]
key = "articles"
name = "Article"

[[content.types]]
key = "stories"
name = "Story"
name_plural = "Stories"
required_fields = ["title", "virtue"]
sort = { field = "title", order = "asc" }

[content.types.features]
audio = true

[build]
output = "public"
"#;

/// Sample article content.
const SAMPLE_ARTICLE: &str = r#"+++
title = "Hello, Directory"
summary = "A first article to show the front-matter shape."
date = "2024-01-15"
tags = ["welcome"]
+++

Write your article body here. The body is carried through as-is;
rendering it is the presentation layer's job.
"#;

/// Sample story content.
const SAMPLE_STORY: &str = r#"+++
title = "The Oak and the Reed"
summary = "A story about bending without breaking."
virtue = "Humility"
tags = ["welcome"]
+++

Once, an oak argued with a reed about strength...
"#;

/// Create a new site with default structure
pub fn new_site(config: &'static SiteConfig) -> Result<()> {
    let root = config.get_root();

    if root.join(CONFIG_FILE).exists() {
        bail!("`{CONFIG_FILE}` already exists in {}", root.display());
    }

    init_site_structure(root)?;
    init_default_config(root)?;
    init_sample_content(root)?;

    log!("init"; "created site at {}", root.display());
    log!("init"; "next: edit {CONFIG_FILE}, then run `curio build`");
    Ok(())
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    fs::write(root.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    Ok(())
}

/// Create content directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in ["content/articles", "content/stories"] {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Write one sample item per content type
fn init_sample_content(root: &Path) -> Result<()> {
    fs::write(
        root.join("content/articles/hello-directory.md"),
        SAMPLE_ARTICLE,
    )?;
    fs::write(
        root.join("content/stories/the-oak-and-the-reed.md"),
        SAMPLE_STORY,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::frontmatter;

    #[test]
    fn test_config_template_parses_and_validates() {
        let config = SiteConfig::from_str(CONFIG_TEMPLATE).unwrap();

        assert_eq!(config.content.type_keys(), vec!["articles", "stories"]);
        let stories = config.content.get("stories").unwrap();
        assert!(stories.features.audio);
        assert!(stories.required_fields.contains(&"virtue".to_string()));
        assert!(config.content.validate().is_ok());
    }

    #[test]
    fn test_sample_content_satisfies_required_fields() {
        let (article, _) = frontmatter::parse(SAMPLE_ARTICLE).unwrap();
        assert!(article.has_field("title"));

        let (story, _) = frontmatter::parse(SAMPLE_STORY).unwrap();
        assert!(story.has_field("title"));
        assert!(story.has_field("virtue"));
    }
}
