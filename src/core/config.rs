use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Worker threads in the work queue. `None` runs everything sequentially.
    pub threads: Option<usize>,
    pub crawl_limit: usize,

    // Fetcher
    pub fetch_redirects: u32,
    pub fetch_timeout_secs: u64,

    /// Lower-case file name suffixes picked up when walking a directory.
    pub text_extensions: Vec<String>,
}

impl Config {
    pub const DEFAULT_THREADS: usize = 5;

    /// Number of workers when running threaded.
    pub fn worker_count(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => Self::DEFAULT_THREADS,
        }
    }

    /// Threaded mode is used when threads were requested or a crawl needs
    /// the work queue.
    pub fn threaded(&self, crawling: bool) -> bool {
        self.threads.is_some() || crawling
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn is_text_file(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.text_extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threads: None,
            crawl_limit: 50,
            fetch_redirects: 3,
            fetch_timeout_secs: 10,
            text_extensions: vec![".txt".to_string(), ".text".to_string()],
        }
    }
}
