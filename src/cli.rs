use std::path::PathBuf;
use clap::Parser;
use wordex::core::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "wordex",
    about = "Builds a word-position index from files or a web crawl and answers queries against it",
    version
)]
pub struct Cli {
    /// Text file or directory to index
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Seed URL to crawl (runs threaded)
    #[arg(long)]
    pub url: Option<String>,

    /// Maximum number of pages to crawl
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Run on a work queue with this many workers
    #[arg(long, num_args = 0..=1, default_missing_value = "5")]
    pub threads: Option<usize>,

    /// Write the index as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "index.json")]
    pub index: Option<PathBuf>,

    /// Write per-location word counts as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "counts.json")]
    pub counts: Option<PathBuf>,

    /// File of queries, one per line
    #[arg(long)]
    pub query: Option<PathBuf>,

    /// Match whole words only
    #[arg(long)]
    pub exact: bool,

    /// Write query results as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "results.json")]
    pub results: Option<PathBuf>,

    /// Log every file, page and query
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            threads: self.threads,
            crawl_limit: self.limit,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_flags_use_default_values() {
        let cli = Cli::parse_from(["wordex", "--threads", "--index", "--results"]);
        assert_eq!(cli.threads, Some(5));
        assert_eq!(cli.index, Some(PathBuf::from("index.json")));
        assert_eq!(cli.results, Some(PathBuf::from("results.json")));
        assert_eq!(cli.counts, None);
        assert_eq!(cli.limit, 50);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cli = Cli::parse_from([
            "wordex", "--path", "docs", "--threads", "3", "--counts", "out.json", "--exact",
        ]);
        assert_eq!(cli.path, Some(PathBuf::from("docs")));
        assert_eq!(cli.config().worker_count(), 3);
        assert_eq!(cli.counts, Some(PathBuf::from("out.json")));
        assert!(cli.exact);
    }

    #[test]
    fn limit_flows_into_config() {
        let cli = Cli::parse_from(["wordex", "--url", "https://example.com/", "--limit", "7"]);
        assert_eq!(cli.config().crawl_limit, 7);
        assert_eq!(Cli::parse_from(["wordex"]).config().crawl_limit, Config::default().crawl_limit);
    }
}
