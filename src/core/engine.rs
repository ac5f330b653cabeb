use std::path::Path;
use std::sync::Arc;
use tracing::info;
use url::Url;
use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::index::builder::{IndexBuilder, ParallelIndexBuilder};
use crate::index::inverted::InvertedIndex;
use crate::index::thread_safe::ThreadSafeIndex;
use crate::output::json::QueryResults;
use crate::parallel::work_queue::WorkQueue;
use crate::query::parallel::ParallelQueryParser;
use crate::query::parser::{QueryEngine, QueryParser};
use crate::web::crawler::WebCrawler;
use crate::web::fetcher::{Fetcher, HttpFetcher};

enum Backend {
    Sequential {
        index: InvertedIndex,
        results: QueryResults,
    },
    Threaded {
        index: Arc<ThreadSafeIndex>,
        queue: Arc<WorkQueue>,
        queries: ParallelQueryParser,
        fetcher: Arc<dyn Fetcher>,
    },
}

/// Owns one index and one set of query results, and drives building,
/// crawling, searching and exporting against them.
///
/// A sequential engine never starts a thread or takes a lock. A threaded
/// engine shares a single [`WorkQueue`] between building, crawling and
/// searching; call [`SearchEngine::shutdown`] when done with it.
pub struct SearchEngine {
    config: Config,
    analyzer: Arc<Analyzer>,
    backend: Backend,
}

impl SearchEngine {
    pub fn sequential(config: Config) -> Self {
        SearchEngine {
            config,
            analyzer: Arc::new(Analyzer::default()),
            backend: Backend::Sequential {
                index: InvertedIndex::new(),
                results: QueryResults::new(),
            },
        }
    }

    /// Starts `config.worker_count()` workers fetching over HTTP.
    pub fn threaded(config: Config) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::from_config(&config));
        Self::with_fetcher(config, fetcher)
    }

    /// Threaded engine with a caller-supplied page source.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let analyzer = Arc::new(Analyzer::default());
        let queue = Arc::new(WorkQueue::new(config.worker_count())?);
        let index = Arc::new(ThreadSafeIndex::new());
        let queries = ParallelQueryParser::new(Arc::clone(&index), Arc::clone(&queue), Arc::clone(&analyzer));
        info!(workers = queue.size(), "threaded engine started");

        Ok(SearchEngine {
            config,
            analyzer,
            backend: Backend::Threaded {
                index,
                queue,
                queries,
                fetcher,
            },
        })
    }

    /// Picks the mode from `config` and whether a crawl is requested.
    pub fn from_config(config: Config, crawling: bool) -> Result<Self> {
        if config.threaded(crawling) {
            Self::threaded(config)
        } else {
            Ok(Self::sequential(config))
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_threaded(&self) -> bool {
        matches!(self.backend, Backend::Threaded { .. })
    }

    /// Indexes every text file under `path`; returns the number of files.
    pub fn build(&mut self, path: &Path) -> Result<usize> {
        match &mut self.backend {
            Backend::Sequential { index, .. } => {
                IndexBuilder::new(Arc::clone(&self.analyzer), self.config.clone()).build(path, index)
            }
            Backend::Threaded { index, queue, .. } => ParallelIndexBuilder::new(
                Arc::clone(index),
                Arc::clone(queue),
                Arc::clone(&self.analyzer),
                self.config.clone(),
            )
            .build(path),
        }
    }

    /// Crawls from `seed`, admitting at most `max(limit, 1)` pages. Returns
    /// the number of pages admitted.
    pub fn crawl(&mut self, seed: &str, limit: usize) -> Result<usize> {
        let Backend::Threaded { index, queue, fetcher, .. } = &self.backend else {
            return Err(Error::invalid_state("crawling requires a threaded engine"));
        };

        let seed = Url::parse(seed)?;
        let crawler = WebCrawler::new(
            Arc::clone(queue),
            Arc::clone(index),
            Arc::clone(fetcher),
            Arc::clone(&self.analyzer),
        );
        crawler.crawl(seed, limit)?;
        Ok(crawler.frontier().len())
    }

    /// Answers every line of the query file. Results recorded before an
    /// I/O failure are kept.
    pub fn search(&mut self, queries: &Path, exact: bool) -> Result<()> {
        match &mut self.backend {
            Backend::Sequential { index, results } => {
                let mut parser = QueryParser::with_results(&*index, &self.analyzer, std::mem::take(results));
                let searched = parser.search_file(queries, exact);
                *results = parser.into_results();
                searched
            }
            Backend::Threaded { queries: parser, .. } => parser.search_file(queries, exact),
        }
    }

    /// Answers a single query line and waits for it.
    pub fn search_line(&mut self, line: &str, exact: bool) -> Result<()> {
        match &mut self.backend {
            Backend::Sequential { index, results } => {
                let mut parser = QueryParser::with_results(&*index, &self.analyzer, std::mem::take(results));
                let searched = parser.search_line(line, exact);
                *results = parser.into_results();
                searched
            }
            Backend::Threaded { queries: parser, .. } => {
                let submitted = parser.search_line(line, exact);
                parser.finish();
                submitted
            }
        }
    }

    pub fn results(&self) -> QueryResults {
        match &self.backend {
            Backend::Sequential { results, .. } => results.clone(),
            Backend::Threaded { queries, .. } => queries.results(),
        }
    }

    /// Total words stored for `location`, or 0 if unknown.
    pub fn word_count(&self, location: &str) -> usize {
        match &self.backend {
            Backend::Sequential { index, .. } => index.count(location),
            Backend::Threaded { index, .. } => index.count(location),
        }
    }

    pub fn locations_for(&self, word: &str) -> Vec<String> {
        match &self.backend {
            Backend::Sequential { index, .. } => index.locations(word).map(str::to_owned).collect(),
            Backend::Threaded { index, .. } => index.locations(word),
        }
    }

    pub fn positions_for(&self, word: &str, location: &str) -> Vec<u32> {
        match &self.backend {
            Backend::Sequential { index, .. } => index.positions(word, location).collect(),
            Backend::Threaded { index, .. } => index.positions(word, location),
        }
    }

    pub fn num_words(&self) -> usize {
        match &self.backend {
            Backend::Sequential { index, .. } => index.num_words(),
            Backend::Threaded { index, .. } => index.num_words(),
        }
    }

    pub fn write_index_json(&self, path: &Path) -> Result<()> {
        match &self.backend {
            Backend::Sequential { index, .. } => index.write_index_json(path),
            Backend::Threaded { index, .. } => index.write_index_json(path),
        }
    }

    pub fn write_counts_json(&self, path: &Path) -> Result<()> {
        match &self.backend {
            Backend::Sequential { index, .. } => index.write_counts_json(path),
            Backend::Threaded { index, .. } => index.write_counts_json(path),
        }
    }

    pub fn write_results_json(&self, path: &Path) -> Result<()> {
        match &self.backend {
            Backend::Sequential { results, .. } => crate::output::json::write_results(results, path),
            Backend::Threaded { queries, .. } => queries.write_results_json(path),
        }
    }

    /// Stops the workers. Safe to call more than once, and a no-op for a
    /// sequential engine.
    pub fn shutdown(&self) {
        if let Backend::Threaded { queue, .. } = &self.backend {
            queue.shutdown();
        }
    }
}
