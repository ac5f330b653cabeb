use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::Result;
use crate::index::inverted::InvertedIndex;
use crate::index::thread_safe::ThreadSafeIndex;
use crate::parallel::work_queue::WorkQueue;
use crate::web::fetcher::Fetcher;
use crate::web::frontier::{Admission, Frontier};
use crate::web::{html, links};

struct CrawlContext {
    queue: Arc<WorkQueue>,
    index: Arc<ThreadSafeIndex>,
    fetcher: Arc<dyn Fetcher>,
    analyzer: Arc<Analyzer>,
    frontier: Frontier,
}

/// Crawls outward from a seed URL on a [`WorkQueue`], indexing every page
/// it fetches into a shared [`ThreadSafeIndex`].
///
/// Pages are indexed in whatever order the pool runs them; the only
/// guarantee is that no more than `max(limit, 1)` URLs are ever admitted.
pub struct WebCrawler {
    context: Arc<CrawlContext>,
}

impl WebCrawler {
    pub fn new(
        queue: Arc<WorkQueue>,
        index: Arc<ThreadSafeIndex>,
        fetcher: Arc<dyn Fetcher>,
        analyzer: Arc<Analyzer>,
    ) -> Self {
        WebCrawler {
            context: Arc::new(CrawlContext {
                queue,
                index,
                fetcher,
                analyzer,
                frontier: Frontier::new(),
            }),
        }
    }

    /// Crawls until every admitted page has been processed.
    ///
    /// The seed is always admitted, even when `limit` is 0.
    pub fn crawl(&self, seed: Url, limit: usize) -> Result<()> {
        let seed = links::clean(seed);
        info!(%seed, limit, "starting crawl");

        self.context.frontier.insert(seed.clone());
        Self::submit(&self.context, seed, limit)?;
        self.context.queue.finish();

        info!(pages = self.context.frontier.len(), "crawl finished");
        Ok(())
    }

    pub fn frontier(&self) -> &Frontier {
        &self.context.frontier
    }

    fn submit(context: &Arc<CrawlContext>, url: Url, limit: usize) -> Result<()> {
        let task_context = Arc::clone(context);
        context.queue.execute(move || Self::crawl_page(&task_context, url, limit))
    }

    fn crawl_page(context: &Arc<CrawlContext>, url: Url, limit: usize) -> Result<()> {
        let Some(page) = context.fetcher.fetch(&url) else {
            warn!(%url, "unable to fetch page");
            return Ok(());
        };

        let mut local = InvertedIndex::new();
        for token in context.analyzer.analyze(&html::strip_markup(&page)) {
            local.add(&token.text, url.as_str(), token.position);
        }
        let words = local.count(url.as_str());
        context.index.merge(local);
        debug!(%url, words, "indexed page");

        if context.frontier.is_full(limit) {
            return Ok(());
        }

        for link in links::list_links(&url, &page) {
            match context.frontier.admit(&link, limit) {
                Admission::Admitted => Self::submit(context, link, limit)?,
                Admission::Duplicate => {}
                Admission::Full => break,
            }
        }
        Ok(())
    }
}
