//! Curio - a directory/blog content engine for plain-file sites.
//!
//! Content lives as front-matter + body files in per-type directories.
//! Curio reads them once, indexes them by type and tag, and answers
//! filtered/sorted/paginated queries consistently for every consumer -
//! the feed, the sitemap, the data exports, and any external page layer
//! built on the [`content::ContentStore`] query interface.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | The query engine: reader, indexes, queries, tag counts, single-flight cache |
//! | [`config`] | `curio.toml` loading and validation, content type table |
//! | [`generator`] | RSS feed, sitemap and JSON data exports |
//! | [`build`] | Build orchestration: load once, generate in parallel |
//! | [`init`] | `curio init` scaffolding |
//! | [`serve`] | Static preview server over the output directory |
//! | [`cli`] | clap argument definitions |
//! | [`logger`] | `log!` macro with colored module prefixes |

pub mod build;
pub mod cli;
pub mod config;
pub mod content;
pub mod generator;
pub mod init;
pub mod logger;
pub mod serve;
