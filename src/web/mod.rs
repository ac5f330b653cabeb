pub mod crawler;
pub mod fetcher;
pub mod frontier;
pub mod html;
pub mod links;

pub use crawler::WebCrawler;
pub use fetcher::{Fetcher, HttpFetcher};
