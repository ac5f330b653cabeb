use clap::Parser;
use tracing::{error, info};
use wordex::core::engine::SearchEngine;

mod cli;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    let config = cli.config();
    let mut engine = match SearchEngine::from_config(config, cli.url.is_some()) {
        Ok(engine) => engine,
        Err(e) => {
            error!("unable to start: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(seed) = &cli.url {
        let limit = engine.config().crawl_limit;
        match engine.crawl(seed, limit) {
            Ok(pages) => info!(pages, "crawled {}", seed),
            Err(e) => error!("unable to crawl {}: {}", seed, e),
        }
    }

    if let Some(path) = &cli.path {
        match engine.build(path) {
            Ok(files) => info!(files, "indexed {}", path.display()),
            Err(e) => error!("unable to build the index at {}: {}", path.display(), e),
        }
    }

    if let Some(path) = &cli.index {
        if let Err(e) = engine.write_index_json(path) {
            error!("unable to write the index to {}: {}", path.display(), e);
        }
    }

    if let Some(path) = &cli.counts {
        if let Err(e) = engine.write_counts_json(path) {
            error!("unable to write counts to {}: {}", path.display(), e);
        }
    }

    if let Some(path) = &cli.query {
        if let Err(e) = engine.search(path, cli.exact) {
            error!("unable to search queries in {}: {}", path.display(), e);
        }
    }

    if let Some(path) = &cli.results {
        if let Err(e) = engine.write_results_json(path) {
            error!("unable to write results to {}: {}", path.display(), e);
        }
    }

    engine.shutdown();
}
