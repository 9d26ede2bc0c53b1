// src/services/dedup.rs

//! First-seen-wins deduplication of listings.

use std::collections::HashSet;

use crate::models::Listing;

/// Identity of a listing for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Upstream identifier
    Id(String),
    /// Title and employer, used when no identifier is available
    Composite { title: String, employer: String },
}

impl DedupKey {
    pub fn new(id: Option<&str>, title: &str, employer: &str) -> Self {
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self::Id(id.to_string()),
            None => Self::Composite {
                title: title.to_string(),
                employer: employer.to_string(),
            },
        }
    }
}

/// Anything that has a [`DedupKey`].
pub trait Keyed {
    fn dedup_key(&self) -> DedupKey;
}

impl Keyed for Listing {
    fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.id.as_deref(), &self.title, &self.employer)
    }
}

/// One merge pass: keeps the first item per key, in arrival order.
#[derive(Debug)]
pub struct Deduplicator<T> {
    seen: HashSet<DedupKey>,
    unique: Vec<T>,
    dropped: usize,
}

impl<T: Keyed> Deduplicator<T> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            unique: Vec::new(),
            dropped: 0,
        }
    }

    /// Offer one item; returns `false` if an item with the same key was already kept.
    pub fn push(&mut self, item: T) -> bool {
        if self.seen.insert(item.dedup_key()) {
            self.unique.push(item);
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    /// Number of duplicates dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.unique.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty()
    }

    /// Unique items in first-seen order.
    pub fn finish(self) -> Vec<T> {
        self.unique
    }
}

impl<T: Keyed> Default for Deduplicator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deduplicate a sequence in one pass.
pub fn dedup<T: Keyed>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut deduplicator = Deduplicator::new();
    deduplicator.extend(items);
    deduplicator.finish()
}
