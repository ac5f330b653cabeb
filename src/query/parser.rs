use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::Result;
use crate::index::SearchIndex;
use crate::output::json::{self, QueryResults};

/// Turns query lines into ranked results, remembering every distinct query.
pub trait QueryEngine {
    fn search_line(&mut self, line: &str, exact: bool) -> Result<()>;

    /// Searches every line of `path`. Returns once all lines are answered.
    fn search_file(&mut self, path: &Path, exact: bool) -> Result<()> {
        for_each_line(path, |line| self.search_line(line, exact))
    }

    /// Copy of the answered queries.
    fn results(&self) -> QueryResults;

    fn write_results_json(&self, path: &Path) -> Result<()>;
}

/// The memo key of a query: its unique sorted stems joined by a space.
pub fn query_key(stems: &BTreeSet<String>) -> String {
    stems.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

pub fn for_each_line<F>(path: &Path, mut f: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    let reader = BufReader::new(File::open(path)?);
    for line in reader.lines() {
        f(&line?)?;
    }
    Ok(())
}

/// Answers queries inline on the calling thread.
pub struct QueryParser<'a, I: SearchIndex + ?Sized> {
    index: &'a I,
    analyzer: &'a Analyzer,
    results: QueryResults,
}

impl<'a, I: SearchIndex + ?Sized> QueryParser<'a, I> {
    pub fn new(index: &'a I, analyzer: &'a Analyzer) -> Self {
        Self::with_results(index, analyzer, QueryResults::new())
    }

    /// Continues from earlier answers, which are not recomputed.
    pub fn with_results(index: &'a I, analyzer: &'a Analyzer, results: QueryResults) -> Self {
        QueryParser {
            index,
            analyzer,
            results,
        }
    }

    pub fn into_results(self) -> QueryResults {
        self.results
    }
}

impl<I: SearchIndex + ?Sized> QueryEngine for QueryParser<'_, I> {
    fn search_line(&mut self, line: &str, exact: bool) -> Result<()> {
        let stems = self.analyzer.unique_stems(line);
        if stems.is_empty() {
            return Ok(());
        }
        let key = query_key(&stems);
        if !self.results.contains_key(&key) {
            let found = self.index.search(&stems, exact);
            self.results.insert(key, found);
        }
        Ok(())
    }

    fn results(&self) -> QueryResults {
        self.results.clone()
    }

    fn write_results_json(&self, path: &Path) -> Result<()> {
        json::write_results(&self.results, path)
    }
}
