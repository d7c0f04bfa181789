//! Tag aggregation.
//!
//! Counts reflect the same corpus generation the query engine sees, so the
//! tags a listing page offers always match what a tag query filters on.

use super::corpus::Corpus;
use std::collections::BTreeMap;

impl Corpus {
    /// Tag → occurrence count, optionally scoped to one content type.
    ///
    /// One count per item per tag (item tags are already de-duplicated at
    /// index time). Unknown type keys produce an empty map.
    pub fn tag_counts(&self, type_filter: Option<&str>) -> BTreeMap<String, usize> {
        match type_filter {
            None => self
                .tag_index()
                .iter()
                .map(|(tag, indices)| (tag.clone(), indices.len()))
                .collect(),
            Some(key) => {
                let mut counts = BTreeMap::new();
                for item in self.type_items(key) {
                    for tag in &item.meta.tags {
                        *counts.entry(tag.clone()).or_insert(0) += 1;
                    }
                }
                counts
            }
        }
    }

    /// Every tag in the corpus. Order is unspecified to consumers.
    pub fn all_tags(&self) -> Vec<String> {
        self.tag_index().keys().cloned().collect()
    }
}
