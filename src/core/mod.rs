pub mod config;
pub mod engine;
pub mod error;

pub use config::Config;
pub use engine::SearchEngine;
pub use error::{Error, ErrorKind, Result};
