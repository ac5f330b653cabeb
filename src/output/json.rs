//! Pretty-printed JSON exports of the index, the word counts and query
//! results. Maps are ordered, so output is deterministic.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::Serialize;
use crate::core::error::Result;
use crate::index::inverted::InvertedIndex;
use crate::search::results::SearchResult;

/// Query key → ranked results.
pub type QueryResults = BTreeMap<String, Vec<SearchResult>>;

pub fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `{ word: { location: [positions] } }`
pub fn write_index(index: &InvertedIndex, path: &Path) -> Result<()> {
    write_pretty(index.postings(), path)
}

/// `{ location: count }`
pub fn write_counts(counts: &BTreeMap<String, usize>, path: &Path) -> Result<()> {
    write_pretty(counts, path)
}

/// `{ query: [ { where, count, score } ] }`
pub fn write_results(results: &QueryResults, path: &Path) -> Result<()> {
    write_pretty(results, path)
}
