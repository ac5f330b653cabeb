//! Word-position inverted index with a custom reader/writer lock, a worker
//! pool, a bounded web crawler and ranked single- and multi-term search.
//!
//! Everything can run on the calling thread ([`index::InvertedIndex`],
//! [`query::QueryParser`]) or on a shared [`parallel::WorkQueue`]
//! ([`index::ThreadSafeIndex`], [`query::ParallelQueryParser`],
//! [`web::WebCrawler`]). [`SearchEngine`](crate::core::SearchEngine) wires either mode together.

pub mod analysis;
pub mod core;
pub mod index;
pub mod output;
pub mod parallel;
pub mod query;
pub mod search;
pub mod web;

pub use crate::core::config::Config;
pub use crate::core::engine::SearchEngine;
pub use crate::core::error::{Error, ErrorKind, Result};
