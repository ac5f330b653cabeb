use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use crate::core::error::Result;
use crate::index::inverted::InvertedIndex;
use crate::parallel::rw_lock::ReadWriteLock;
use crate::search::results::SearchResult;

/// [`InvertedIndex`] behind a [`ReadWriteLock`].
///
/// Every mutating call holds the write lock and every read-only call holds
/// the read lock for its whole duration; no call is split into smaller
/// critical sections. Read accessors return owned data because views into
/// the index cannot outlive the lock.
#[derive(Debug, Default)]
pub struct ThreadSafeIndex {
    index: ReadWriteLock<InvertedIndex>,
}

impl ThreadSafeIndex {
    pub fn new() -> Self {
        ThreadSafeIndex::default()
    }

    pub fn add(&self, word: &str, location: &str, position: u32) -> bool {
        self.index.write().add(word, location, position)
    }

    /// Folds a privately built index in under a single write lock.
    pub fn merge(&self, other: InvertedIndex) {
        self.index.write().merge(other);
    }

    pub fn search(&self, terms: &BTreeSet<String>, exact: bool) -> Vec<SearchResult> {
        self.index.read().search(terms, exact)
    }

    pub fn search_exact(&self, terms: &BTreeSet<String>) -> Vec<SearchResult> {
        self.index.read().search_exact(terms)
    }

    pub fn search_partial(&self, terms: &BTreeSet<String>) -> Vec<SearchResult> {
        self.index.read().search_partial(terms)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.index.read().contains_word(word)
    }

    pub fn contains_location(&self, word: &str, location: &str) -> bool {
        self.index.read().contains_location(word, location)
    }

    pub fn contains_position(&self, word: &str, location: &str, position: u32) -> bool {
        self.index.read().contains_position(word, location, position)
    }

    pub fn num_words(&self) -> usize {
        self.index.read().num_words()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    pub fn location_count(&self, word: &str) -> usize {
        self.index.read().location_count(word)
    }

    pub fn position_count(&self, word: &str, location: &str) -> usize {
        self.index.read().position_count(word, location)
    }

    pub fn words(&self) -> Vec<String> {
        self.index.read().words().map(str::to_owned).collect()
    }

    pub fn locations(&self, word: &str) -> Vec<String> {
        self.index.read().locations(word).map(str::to_owned).collect()
    }

    pub fn positions(&self, word: &str, location: &str) -> Vec<u32> {
        self.index.read().positions(word, location).collect()
    }

    pub fn count(&self, location: &str) -> usize {
        self.index.read().count(location)
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.index.read().counts().clone()
    }

    /// Copy of the whole index taken under one read lock.
    pub fn snapshot(&self) -> InvertedIndex {
        self.index.read().clone()
    }

    pub fn write_index_json(&self, path: &Path) -> Result<()> {
        self.index.read().write_index_json(path)
    }

    pub fn write_counts_json(&self, path: &Path) -> Result<()> {
        self.index.read().write_counts_json(path)
    }

    pub fn into_inner(self) -> InvertedIndex {
        self.index.into_inner()
    }
}

impl From<InvertedIndex> for ThreadSafeIndex {
    fn from(index: InvertedIndex) -> Self {
        ThreadSafeIndex {
            index: ReadWriteLock::new(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn concurrent_duplicate_add_counts_once() {
        let index = Arc::new(ThreadSafeIndex::new());
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let index = Arc::clone(&index);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    index.add("cat", "b.txt", 1)
                })
            })
            .collect();

        let inserted: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(inserted.iter().filter(|&&i| i).count(), 1);
        assert_eq!(index.count("b.txt"), 1);
    }

    #[test]
    fn concurrent_merges_and_searches_agree() {
        let index = Arc::new(ThreadSafeIndex::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let index = Arc::clone(&index);
                thread::spawn(move || {
                    let location = format!("doc{}.txt", t % 4);
                    let mut local = InvertedIndex::new();
                    for p in 1..=50 {
                        local.add(if p % 2 == 0 { "even" } else { "odd" }, &location, p);
                    }
                    index.merge(local);
                    let terms = BTreeSet::from(["even".to_string()]);
                    assert!(!index.search(&terms, true).is_empty());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // pairs of threads wrote identical triples into each location
        for t in 0..4 {
            assert_eq!(index.count(&format!("doc{}.txt", t)), 50);
        }
        assert_eq!(index.locations("even").len(), 4);
    }

    #[test]
    fn snapshot_matches_accessors() {
        let index = ThreadSafeIndex::new();
        index.add("run", "a.txt", 1);
        index.add("jump", "a.txt", 2);
        let snapshot = index.snapshot();
        assert_eq!(snapshot.count("a.txt"), index.count("a.txt"));
        assert_eq!(index.words(), vec!["jump".to_string(), "run".to_string()]);
        assert_eq!(index.positions("run", "a.txt"), vec![1]);
        assert!(index.positions("run", "zzz").is_empty());
    }
}
