pub mod builder;
pub mod inverted;
pub mod thread_safe;

use std::collections::BTreeSet;
use crate::search::results::SearchResult;

pub use builder::{IndexBuilder, ParallelIndexBuilder};
pub use inverted::InvertedIndex;
pub use thread_safe::ThreadSafeIndex;

/// Anything that can answer a ranked multi-term search.
pub trait SearchIndex: Send + Sync {
    /// `terms` must already be normalized.
    fn search(&self, terms: &BTreeSet<String>, exact: bool) -> Vec<SearchResult>;
}

impl SearchIndex for InvertedIndex {
    fn search(&self, terms: &BTreeSet<String>, exact: bool) -> Vec<SearchResult> {
        InvertedIndex::search(self, terms, exact)
    }
}

impl SearchIndex for ThreadSafeIndex {
    fn search(&self, terms: &BTreeSet<String>, exact: bool) -> Vec<SearchResult> {
        ThreadSafeIndex::search(self, terms, exact)
    }
}
