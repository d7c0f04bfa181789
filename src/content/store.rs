//! Content store - the caching layer and public query surface.
//!
//! The corpus is read once per process lifetime and shared by every
//! consumer (pages, feed, sitemap, exports). Because the source tree is
//! immutable at read time, the store never invalidates: its lifecycle is
//!
//! ```text
//! Uninitialized ──► Loading ──► Ready
//!                      │
//!                      └──────► Error (terminal)
//! ```
//!
//! Concurrent first calls during `Loading` wait on a condvar and share the
//! in-flight load's result - exactly one filesystem read happens no matter
//! how many renders race (single-flight). Once `Ready`, reads clone an
//! `Arc` and run lock-free against the corpus.
//!
//! The loader is injected so tests can count invocations and construct
//! fresh instances instead of touching ambient global state.

use super::{
    corpus::Corpus,
    error::LoadError,
    item::{ContentItem, SlugEntry},
    query::{ContentQuery, PaginatedResult},
};
use crate::config::{ContentConfig, SiteConfig};
use anyhow::Result;
use parking_lot::{Condvar, Mutex};
use std::{collections::BTreeMap, sync::Arc};

/// Corpus loader closure. Runs at most once per store.
type Loader = Box<dyn Fn() -> Result<Corpus, LoadError> + Send + Sync>;

/// Cache lifecycle states.
enum CacheState {
    Uninitialized,
    Loading,
    Ready(Arc<Corpus>),
    /// Terminal: the failure replays to every subsequent caller
    Error(LoadError),
}

/// Single-flight content cache plus the query interface built on it.
pub struct ContentStore {
    content: ContentConfig,
    state: Mutex<CacheState>,
    loaded: Condvar,
    loader: Loader,
}

impl ContentStore {
    /// Store backed by the configured content tree.
    pub fn new(config: &'static SiteConfig) -> Self {
        Self::with_loader(
            config.content.clone(),
            Box::new(move || Corpus::load(config)),
        )
    }

    /// Store with an injected loader (used by tests and custom callers).
    pub fn with_loader(content: ContentConfig, loader: Loader) -> Self {
        Self {
            content,
            state: Mutex::new(CacheState::Uninitialized),
            loaded: Condvar::new(),
            loader,
        }
    }

    /// Get the corpus, loading it on first call.
    ///
    /// Blocks while another caller's load is in flight and shares its
    /// result. The load itself runs with the state lock RELEASED, so
    /// waiting is the only contention.
    pub fn corpus(&self) -> Result<Arc<Corpus>, LoadError> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                CacheState::Ready(corpus) => return Ok(Arc::clone(corpus)),
                CacheState::Error(err) => return Err(err.clone()),
                CacheState::Loading => self.loaded.wait(&mut state),
                CacheState::Uninitialized => {
                    *state = CacheState::Loading;
                    drop(state);

                    let result = (self.loader)();

                    state = self.state.lock();
                    *state = match result {
                        Ok(corpus) => CacheState::Ready(Arc::new(corpus)),
                        Err(err) => CacheState::Error(err),
                    };
                    self.loaded.notify_all();
                    // loop once more to return through Ready/Error
                }
            }
        }
    }

    // ========================================================================
    // Query Interface
    // ========================================================================

    /// Filtered, sorted, paginated content.
    pub fn get_content(&self, query: &ContentQuery) -> Result<PaginatedResult> {
        self.corpus()?.query(query)
    }

    /// Detail lookup. `Ok(None)` when no item matches.
    pub fn get_content_by_slug(
        &self,
        type_key: &str,
        slug: &str,
    ) -> Result<Option<ContentItem>> {
        Ok(self.corpus()?.get_by_slug(type_key, slug).cloned())
    }

    /// Every `(content_type, slug)` pair, for detail page enumeration.
    pub fn get_all_content_slugs(&self) -> Result<Vec<SlugEntry>> {
        Ok(self.corpus()?.slug_entries())
    }

    /// Tag counts scoped to one content type.
    pub fn get_tags_for_type(&self, type_key: &str) -> Result<BTreeMap<String, usize>> {
        Ok(self.corpus()?.tag_counts(Some(type_key)))
    }

    /// Global tag counts.
    pub fn get_all_tag_counts(&self) -> Result<BTreeMap<String, usize>> {
        Ok(self.corpus()?.tag_counts(None))
    }

    /// Every tag name in the corpus.
    pub fn get_all_tags(&self) -> Result<Vec<String>> {
        Ok(self.corpus()?.all_tags())
    }

    /// Items carrying one tag, corpus insertion order.
    pub fn get_content_by_tag(&self, tag: &str) -> Result<Vec<ContentItem>> {
        Ok(self
            .corpus()?
            .items_with_tag(tag)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Registered type keys, declaration order. Config-backed: does not
    /// trigger a load.
    pub fn get_content_types(&self) -> Vec<&str> {
        self.content.type_keys()
    }

    /// Whether `key` names a registered content type. The query path
    /// treats unknown types as "zero matches"; this is the check callers
    /// use to tell the two apart.
    pub fn is_valid_content_type(&self, key: &str) -> bool {
        self.content.is_valid_type(key)
    }
}
