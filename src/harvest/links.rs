//! Session-scoped store of harvested post links.

use std::collections::HashMap;

/// Caption metadata for a harvested post.
///
/// The harvester never populates this; it exists so that re-inserting a link
/// overwrites the value with the empty placeholder, the same way the
/// collection behaved historically. Export reads keys only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caption {
    pub text: Option<String>,
}

/// Key-unique mapping of post URL to caption placeholder.
///
/// Keys are never removed during a session, and insertion order is preserved
/// for export. Dropped when the session ends; nothing persists across runs.
#[derive(Debug, Default)]
pub struct LinkStore {
    entries: HashMap<String, Caption>,
    order: Vec<String>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link, returning whether it was new.
    ///
    /// Re-insertion resets the caption to the empty placeholder but leaves
    /// the key set and ordering untouched.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        let new = !self.entries.contains_key(&url);
        self.entries.insert(url.clone(), Caption::default());
        if new {
            self.order.push(url);
        }
        new
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Harvested URLs in insertion order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
