//! Content loading error types.
//!
//! `LoadError` covers the fatal cases only; per-file problems are
//! [`Diagnostic`](super::reader::Diagnostic)s, never errors.
//!
//! The variants are `Clone` so the caching layer can replay a failed load
//! to every subsequent caller.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal content loading errors
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    #[error("content root not found: `{0}`")]
    ContentRootMissing(PathBuf),

    #[error("duplicate slug `{slug}` in content type `{type_key}`: `{first}` and `{second}`")]
    DuplicateSlug {
        type_key: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}
