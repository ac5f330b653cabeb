use std::path::Path;
use std::sync::Arc;
use parking_lot::Mutex;
use tracing::debug;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::Result;
use crate::index::thread_safe::ThreadSafeIndex;
use crate::output::json::{self, QueryResults};
use crate::parallel::work_queue::WorkQueue;
use crate::query::parser::{for_each_line, query_key, QueryEngine};

/// Answers each query line as a separate work-queue task.
///
/// Lines that normalize to the same key may race and be searched twice, but
/// the result map only ever records the first answer.
pub struct ParallelQueryParser {
    index: Arc<ThreadSafeIndex>,
    queue: Arc<WorkQueue>,
    analyzer: Arc<Analyzer>,
    results: Arc<Mutex<QueryResults>>,
}

impl ParallelQueryParser {
    pub fn new(index: Arc<ThreadSafeIndex>, queue: Arc<WorkQueue>, analyzer: Arc<Analyzer>) -> Self {
        ParallelQueryParser {
            index,
            queue,
            analyzer,
            results: Arc::new(Mutex::new(QueryResults::new())),
        }
    }

    /// Queues one line without waiting for it.
    pub fn submit_line(&self, line: &str, exact: bool) -> Result<()> {
        let line = line.to_owned();
        let index = Arc::clone(&self.index);
        let analyzer = Arc::clone(&self.analyzer);
        let results = Arc::clone(&self.results);

        self.queue.execute(move || {
            let stems = analyzer.unique_stems(&line);
            if stems.is_empty() {
                return Ok(());
            }
            let key = query_key(&stems);
            if results.lock().contains_key(&key) {
                return Ok(());
            }

            let found = index.search(&stems, exact);
            debug!(query = %key, hits = found.len(), "answered query");
            // another task may have answered the same key meanwhile
            results.lock().entry(key).or_insert(found);
            Ok(())
        })
    }

    /// Waits for every queued line.
    pub fn finish(&self) {
        self.queue.finish();
    }
}

impl QueryEngine for ParallelQueryParser {
    fn search_line(&mut self, line: &str, exact: bool) -> Result<()> {
        self.submit_line(line, exact)
    }

    fn search_file(&mut self, path: &Path, exact: bool) -> Result<()> {
        let submitted = for_each_line(path, |line| self.submit_line(line, exact));
        self.queue.finish();
        submitted
    }

    fn results(&self) -> QueryResults {
        self.results.lock().clone()
    }

    fn write_results_json(&self, path: &Path) -> Result<()> {
        let results = self.results.lock();
        json::write_results(&results, path)
    }
}
