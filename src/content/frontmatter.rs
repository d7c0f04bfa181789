//! Front-matter parsing.
//!
//! Content files carry a TOML header block between `+++` delimiter lines,
//! followed by the raw body:
//!
//! ```text
//! +++
//! title = "On Patience"
//! date = "2024-03-01"
//! tags = ["virtue", "practice"]
//! +++
//!
//! Body text. Never parsed to HTML here - rendering is a collaborator's job.
//! ```
//!
//! Unknown header fields are not an error: they are collected into `extra`
//! so type-specific fields (e.g. a story's `virtue`) survive without the
//! engine knowing about them.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Front-matter delimiter line.
const DELIMITER: &str = "+++";

/// Parsed front-matter header of one content file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
    /// Publication date as an ISO 8601 string (e.g., "2024-01-15").
    pub date: Option<String>,
    pub author: Option<String>,
    /// Cover image URL.
    pub image: Option<String>,
    /// Audio file URL.
    pub audio: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Type-specific fields the engine carries through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl FrontMatter {
    /// Whether a field is present, for required-field validation.
    ///
    /// Known fields count as present when set (non-empty for `tags`);
    /// anything else is looked up in `extra`.
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "title" => self.title.is_some(),
            "summary" => self.summary.is_some(),
            "date" => self.date.is_some(),
            "author" => self.author.is_some(),
            "image" => self.image.is_some(),
            "audio" => self.audio.is_some(),
            "tags" => !self.tags.is_empty(),
            other => self.extra.contains_key(other),
        }
    }
}

/// Split raw file text into front-matter and body.
///
/// A file without an opening delimiter has no front-matter: the whole text
/// is the body and every field is unset (required-field validation then
/// rejects it downstream if the type demands fields).
pub fn parse(raw: &str) -> Result<(FrontMatter, String)> {
    let Some(rest) = raw.strip_prefix(DELIMITER) else {
        return Ok((FrontMatter::default(), raw.to_owned()));
    };

    // The opening delimiter must be a whole line
    let rest = match rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        Some(rest) => rest,
        None if rest.is_empty() => rest,
        None => bail!("malformed front-matter: text after opening `{DELIMITER}`"),
    };

    let Some(end) = rest.find(&format!("\n{DELIMITER}")) else {
        bail!("unclosed front-matter block");
    };

    let header = rest[..end].trim_end_matches('\r');
    let mut body = &rest[end + 1 + DELIMITER.len()..];

    // Drop the newline terminating the closing delimiter line
    if let Some(stripped) = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n')) {
        body = stripped;
    }

    let matter: FrontMatter =
        toml::from_str(header).context("invalid TOML in front-matter block")?;

    Ok((matter, body.to_owned()))
}
