// src/harvest/dedup.rs

use std::collections::HashSet;

/// Set of identity keys already written for one view's harvest.
///
/// Keys are never evicted: the ranking list is append-only from the
/// harvester's perspective, so a later encounter of a known key, even with a
/// shifted rank, is a re-render of the same item. First seen wins.
#[derive(Debug, Default)]
pub struct DedupIndex {
    keys: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn mark_seen(&mut self, key: &str) {
        self.keys.insert(key.to_string());
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
