use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use std::path::Path;
use crate::core::error::Result;
use crate::output::json;
use crate::search::results::SearchResult;

/// Word positions inside one location, ascending and unique.
pub type Positions = BTreeSet<u32>;

/// Word → location → positions, plus the word count of every location.
///
/// Keys are kept ordered so exports iterate deterministically and partial
/// search can seek straight to a prefix range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: BTreeMap<String, BTreeMap<String, Positions>>,
    counts: BTreeMap<String, usize>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Records `word` at `position` of `location`. Returns false (and changes
    /// nothing) when the triple is already present.
    pub fn add(&mut self, word: &str, location: &str, position: u32) -> bool {
        let inserted = self
            .postings
            .entry(word.to_owned())
            .or_default()
            .entry(location.to_owned())
            .or_default()
            .insert(position);

        if inserted {
            *self.counts.entry(location.to_owned()).or_insert(0) += 1;
        }
        inserted
    }

    /// Adds words at consecutive positions starting at `start`; returns the
    /// next free position.
    pub fn add_all<I, S>(&mut self, words: I, location: &str, start: u32) -> u32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut position = start;
        for word in words {
            self.add(word.as_ref(), location, position);
            position += 1;
        }
        position
    }

    /// Folds `other` into this index. Only positions that were not already
    /// present are counted, so merging overlapping indexes never inflates
    /// the word counts.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (word, locations) in other.postings {
            match self.postings.entry(word) {
                Entry::Vacant(entry) => {
                    for (location, positions) in &locations {
                        *self.counts.entry(location.clone()).or_insert(0) += positions.len();
                    }
                    entry.insert(locations);
                }
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    for (location, positions) in locations {
                        let added = match existing.entry(location.clone()) {
                            Entry::Vacant(slot) => {
                                let added = positions.len();
                                slot.insert(positions);
                                added
                            }
                            Entry::Occupied(mut slot) => {
                                let slot = slot.get_mut();
                                positions.into_iter().filter(|p| slot.insert(*p)).count()
                            }
                        };
                        if added > 0 {
                            *self.counts.entry(location).or_insert(0) += added;
                        }
                    }
                }
            }
        }
    }

    pub fn search(&self, terms: &BTreeSet<String>, exact: bool) -> Vec<SearchResult> {
        if exact {
            self.search_exact(terms)
        } else {
            self.search_partial(terms)
        }
    }

    /// Matches indexed words equal to a term.
    pub fn search_exact(&self, terms: &BTreeSet<String>) -> Vec<SearchResult> {
        let mut collector = Collector::new(self);
        for term in terms {
            if let Some(locations) = self.postings.get(term) {
                collector.collect(locations);
            }
        }
        collector.finish()
    }

    /// Matches indexed words that start with a term.
    pub fn search_partial(&self, terms: &BTreeSet<String>) -> Vec<SearchResult> {
        let mut collector = Collector::new(self);
        for term in terms {
            let range = self
                .postings
                .range::<str, _>((Bound::Included(term.as_str()), Bound::Unbounded))
                .take_while(|(word, _)| word.starts_with(term.as_str()));
            for (_, locations) in range {
                collector.collect(locations);
            }
        }
        collector.finish()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.postings.contains_key(word)
    }

    pub fn contains_location(&self, word: &str, location: &str) -> bool {
        self.postings
            .get(word)
            .is_some_and(|locations| locations.contains_key(location))
    }

    pub fn contains_position(&self, word: &str, location: &str, position: u32) -> bool {
        self.postings
            .get(word)
            .and_then(|locations| locations.get(location))
            .is_some_and(|positions| positions.contains(&position))
    }

    /// Number of distinct words.
    pub fn num_words(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of locations containing `word`, zero if unknown.
    pub fn location_count(&self, word: &str) -> usize {
        self.postings.get(word).map_or(0, BTreeMap::len)
    }

    /// Number of positions of `word` in `location`, zero if unknown.
    pub fn position_count(&self, word: &str, location: &str) -> usize {
        self.postings
            .get(word)
            .and_then(|locations| locations.get(location))
            .map_or(0, BTreeSet::len)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn locations<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.postings
            .get(word)
            .into_iter()
            .flat_map(|locations| locations.keys().map(String::as_str))
    }

    pub fn positions<'a>(&'a self, word: &str, location: &str) -> impl Iterator<Item = u32> + use<'a> {
        self.postings
            .get(word)
            .and_then(|locations| locations.get(location))
            .into_iter()
            .flat_map(|positions| positions.iter().copied())
    }

    /// Word count of `location`, zero if unknown.
    pub fn count(&self, location: &str) -> usize {
        self.counts.get(location).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn postings(&self) -> &BTreeMap<String, BTreeMap<String, Positions>> {
        &self.postings
    }

    pub fn write_index_json(&self, path: &Path) -> Result<()> {
        json::write_index(self, path)
    }

    pub fn write_counts_json(&self, path: &Path) -> Result<()> {
        json::write_counts(self.counts(), path)
    }
}

/// Accumulates one result per location over a single search call.
struct Collector<'a> {
    index: &'a InvertedIndex,
    lookup: HashMap<&'a str, usize>,
    results: Vec<SearchResult>,
}

impl<'a> Collector<'a> {
    fn new(index: &'a InvertedIndex) -> Self {
        Collector {
            index,
            lookup: HashMap::new(),
            results: Vec::new(),
        }
    }

    fn collect(&mut self, locations: &'a BTreeMap<String, Positions>) {
        for (location, positions) in locations {
            let slot = match self.lookup.get(location.as_str()) {
                Some(&slot) => slot,
                None => {
                    self.results.push(SearchResult::new(location.clone()));
                    self.lookup.insert(location.as_str(), self.results.len() - 1);
                    self.results.len() - 1
                }
            };
            // every indexed location has a count
            let total = self.index.counts[location.as_str()];
            self.results[slot].update(positions.len(), total);
        }
    }

    fn finish(mut self) -> Vec<SearchResult> {
        self.results.sort();
        self.results
    }
}
