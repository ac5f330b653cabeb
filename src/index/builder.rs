use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::index::inverted::InvertedIndex;
use crate::index::thread_safe::ThreadSafeIndex;
use crate::parallel::work_queue::WorkQueue;

/// Calls `visit` for every text file under `root`, in sorted order. A root
/// that is itself a text file is visited directly.
pub fn walk_text_files<F>(root: &Path, config: &Config, visit: &mut F) -> Result<()>
where
    F: FnMut(PathBuf) -> Result<()>,
{
    if root.is_dir() {
        let mut entries = fs::read_dir(root)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();
        for entry in entries {
            walk_text_files(&entry, config, visit)?;
        }
    } else if config.is_text_file(&root.to_string_lossy()) {
        visit(root.to_path_buf())?;
    }
    Ok(())
}

/// Stems every line of `path` into `index`, numbering words from 1 across
/// the whole file. Returns the number of words added.
pub fn index_file(path: &Path, analyzer: &Analyzer, index: &mut InvertedIndex) -> Result<u32> {
    let location = path.to_string_lossy();
    let reader = BufReader::new(File::open(path)?);
    let mut offset = 0u32;

    for line in reader.lines() {
        let tokens = analyzer.analyze(&line?);
        let added = tokens.len() as u32;
        for token in tokens {
            index.add(&token.text, &location, offset + token.position);
        }
        offset += added;
    }

    Ok(offset)
}

/// Builds an [`InvertedIndex`] from a directory tree on the calling thread.
pub struct IndexBuilder {
    analyzer: Arc<Analyzer>,
    config: Config,
}

impl IndexBuilder {
    pub fn new(analyzer: Arc<Analyzer>, config: Config) -> Self {
        IndexBuilder { analyzer, config }
    }

    /// Returns the number of files indexed. The first unreadable file
    /// aborts the build; files indexed before it stay in `index`.
    pub fn build(&self, root: &Path, index: &mut InvertedIndex) -> Result<usize> {
        let mut files = 0;
        walk_text_files(root, &self.config, &mut |path| {
            let words = index_file(&path, &self.analyzer, index)?;
            debug!(file = %path.display(), words, "indexed file");
            files += 1;
            Ok(())
        })?;
        info!(root = %root.display(), files, "index built");
        Ok(files)
    }
}

/// Builds into a [`ThreadSafeIndex`] with one work-queue task per file.
///
/// Each task stems its file into a private index and merges it with a
/// single write lock, so parsing never contends on the shared index.
pub struct ParallelIndexBuilder {
    index: Arc<ThreadSafeIndex>,
    queue: Arc<WorkQueue>,
    analyzer: Arc<Analyzer>,
    config: Config,
}

impl ParallelIndexBuilder {
    pub fn new(
        index: Arc<ThreadSafeIndex>,
        queue: Arc<WorkQueue>,
        analyzer: Arc<Analyzer>,
        config: Config,
    ) -> Self {
        ParallelIndexBuilder {
            index,
            queue,
            analyzer,
            config,
        }
    }

    /// Returns the number of files submitted. Unreadable files are logged by
    /// the work queue and skipped; directory errors are returned after the
    /// submitted files have finished.
    pub fn build(&self, root: &Path) -> Result<usize> {
        let mut files = 0;
        let walked = walk_text_files(root, &self.config, &mut |path| {
            let index = Arc::clone(&self.index);
            let analyzer = Arc::clone(&self.analyzer);
            self.queue.execute(move || {
                let mut local = InvertedIndex::new();
                let words = index_file(&path, &analyzer, &mut local).map_err(|e| {
                    Error::new(e.kind, format!("unable to index {}: {}", path.display(), e.context))
                })?;
                index.merge(local);
                debug!(file = %path.display(), words, "indexed file");
                Ok(())
            })?;
            files += 1;
            Ok(())
        });

        self.queue.finish();
        walked?;
        info!(root = %root.display(), files, "index built");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "Run run\njump").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("b.TEXT"), "jumping cats").unwrap();
        fs::write(dir.path().join("ignored.md"), "run").unwrap();
        dir
    }

    #[test]
    fn sequential_build_numbers_words_across_lines() {
        let dir = corpus();
        let builder = IndexBuilder::new(Arc::new(Analyzer::standard_english()), Config::default());
        let mut index = InvertedIndex::new();
        let files = builder.build(dir.path(), &mut index).unwrap();

        let a = dir.path().join("a.txt").to_string_lossy().into_owned();
        let b = dir.path().join("nested").join("b.TEXT").to_string_lossy().into_owned();
        assert_eq!(files, 2);
        assert_eq!(index.count(&a), 3);
        assert_eq!(index.count(&b), 2);
        assert_eq!(index.positions("run", &a).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(index.positions("jump", &a).collect::<Vec<_>>(), vec![3]);
        assert_eq!(index.locations("jump").count(), 2);
        assert!(!index.contains_location("run", &dir.path().join("ignored.md").to_string_lossy()));
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let dir = corpus();
        let analyzer = Arc::new(Analyzer::standard_english());

        let mut expected = InvertedIndex::new();
        IndexBuilder::new(Arc::clone(&analyzer), Config::default())
            .build(dir.path(), &mut expected)
            .unwrap();

        let shared = Arc::new(ThreadSafeIndex::new());
        let queue = Arc::new(WorkQueue::new(3).unwrap());
        let files = ParallelIndexBuilder::new(Arc::clone(&shared), queue, analyzer, Config::default())
            .build(dir.path())
            .unwrap();

        assert_eq!(files, 2);
        assert_eq!(shared.snapshot(), expected);
    }

    #[test]
    fn single_file_root_is_indexed() {
        let dir = corpus();
        let path = dir.path().join("a.txt");
        let mut index = InvertedIndex::new();
        IndexBuilder::new(Arc::new(Analyzer::default()), Config::default())
            .build(&path, &mut index)
            .unwrap();
        assert_eq!(index.count(&path.to_string_lossy()), 3);
    }

    #[test]
    fn missing_paths_are_skipped_or_reported() {
        let mut index = InvertedIndex::new();
        let builder = IndexBuilder::new(Arc::new(Analyzer::default()), Config::default());
        // not a directory and not a text file: nothing to do
        assert_eq!(builder.build(Path::new("/definitely/not/here"), &mut index).unwrap(), 0);
        // a text-file path that does not exist fails to open
        assert!(builder.build(Path::new("/definitely/not/here.txt"), &mut index).is_err());
        assert!(index.is_empty());
    }
}
