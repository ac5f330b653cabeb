pub mod parallel;
pub mod parser;

pub use parallel::ParallelQueryParser;
pub use parser::{query_key, QueryEngine, QueryParser};
