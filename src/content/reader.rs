//! Content source reader.
//!
//! Walks each content type's directory, parses front-matter, validates
//! required fields, and derives slugs. Per-file failures are isolated: a
//! malformed file is excluded with a [`Diagnostic`] while the rest of the
//! directory still loads. The only fatal outcomes are a missing content
//! root and a slug collision within a type.
//!
//! Files are visited in sorted filename order so corpus insertion order is
//! reproducible run to run - the query engine's tie-breaks depend on it.

use super::{
    error::LoadError,
    frontmatter::{self, FrontMatter},
};
use crate::config::{ContentTypeConfig, SiteConfig};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// File extension for content files.
const CONTENT_EXT: &str = "md";

/// One successfully parsed content file, not yet indexed.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Key of the content type whose directory held the file
    pub type_key: String,
    /// File stem, lower-cased
    pub slug: String,
    /// Source path, kept for diagnostics
    pub path: PathBuf,
    pub matter: FrontMatter,
    pub body: String,
}

/// A skipped file and the reason it was skipped.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub reason: String,
}

impl Diagnostic {
    fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Read every configured content type directory under the content root.
///
/// Returns the parsed records in (type declaration, filename) order plus
/// the diagnostics for every skipped file.
pub fn read_all(config: &SiteConfig) -> Result<(Vec<RawRecord>, Vec<Diagnostic>), LoadError> {
    let root = &config.content.root;
    if !root.is_dir() {
        return Err(LoadError::ContentRootMissing(root.clone()));
    }

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for type_config in &config.content.types {
        read_type(root, type_config, &mut records, &mut diagnostics)?;
    }

    Ok((records, diagnostics))
}

/// Read one content type's directory.
fn read_type(
    root: &Path,
    type_config: &ContentTypeConfig,
    records: &mut Vec<RawRecord>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), LoadError> {
    let dir = root.join(type_config.source_dir());
    if !dir.is_dir() {
        // An absent type directory is an empty type, not a fatal error
        diagnostics.push(Diagnostic::new(
            &dir,
            format!("content directory for `{}` not found", type_config.key),
        ));
        return Ok(());
    }

    // slug → first source path, for collision reporting
    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();

    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                diagnostics.push(Diagnostic::new(&dir, format!("unreadable entry: {err}")));
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(CONTENT_EXT)
        {
            continue;
        }

        let Some(slug) = derive_slug(path) else {
            diagnostics.push(Diagnostic::new(path, "invalid filename encoding"));
            continue;
        };

        if let Some(first) = seen.get(&slug) {
            return Err(LoadError::DuplicateSlug {
                type_key: type_config.key.clone(),
                slug,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }

        match read_file(path, type_config) {
            Ok((matter, body)) => {
                seen.insert(slug.clone(), path.to_path_buf());
                records.push(RawRecord {
                    type_key: type_config.key.clone(),
                    slug,
                    path: path.to_path_buf(),
                    matter,
                    body,
                });
            }
            Err(reason) => diagnostics.push(Diagnostic::new(path, reason)),
        }
    }

    Ok(())
}

/// Slug derivation: filename minus extension, lower-cased.
fn derive_slug(path: &Path) -> Option<String> {
    Some(path.file_stem()?.to_str()?.to_lowercase())
}

/// Parse one file and check its required fields.
///
/// Returns the skip reason on failure; the caller records it as a
/// diagnostic.
fn read_file(
    path: &Path,
    type_config: &ContentTypeConfig,
) -> Result<(FrontMatter, String), String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unreadable: {err}"))?;
    let (matter, body) = frontmatter::parse(&raw).map_err(|err| format!("{err:#}"))?;

    // `title` is an engine invariant, checked even when the type omits it
    if matter.title.is_none() {
        return Err("missing required field `title`".into());
    }
    for field in &type_config.required_fields {
        if !matter.has_field(field) {
            return Err(format!("missing required field `{field}`"));
        }
    }

    Ok((matter, body))
}
