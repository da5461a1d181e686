//! Directory batch lexing
//!
//! Discovers `.swift` files, builds the lexer tables once and lexes each file
//! either sequentially or across worker threads sharing the same tables.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::file_processor::is_swift_path;
use crate::lexical::LexerTables;
use crate::logging::codes;
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(8))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    /// Worker count clamped to the compile-time ceiling
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    /// File cap from the config and the compile-time ceiling, whichever is lower
    pub fn effective_max_files(&self) -> usize {
        self.max_files
            .map_or(MAX_FILES_PER_BATCH, |max| max.min(MAX_FILES_PER_BATCH))
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    /// Tokens across all successfully lexed files
    pub fn total_tokens(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.token_count())
            .sum()
    }

    /// Invalid fragments across all successfully lexed files
    pub fn total_invalid(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.invalid_count())
            .sum()
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    /// One line for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} files processed: {} ok, {} failed; {} tokens, {} invalid fragments in {} ms",
            self.files_processed,
            self.success_count(),
            self.failure_count(),
            self.total_tokens(),
            self.total_invalid(),
            self.processing_duration.as_millis()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No such directory: {path}")]
    DirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("No .swift files under {path}")]
    NoFilesFound { path: String },

    #[error("Cannot list {message}")]
    Traversal { message: String },

    #[error("Batch aborted: {message}")]
    WorkerPanicked { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NotADirectory { .. } => codes::batch::NOT_A_DIRECTORY,
            BatchError::NoFilesFound { .. } => codes::batch::NO_SOURCE_FILES,
            BatchError::Traversal { .. } => codes::batch::DISCOVERY_FAILED,
            BatchError::WorkerPanicked { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// `.swift` files under `dir_path` in path order, capped at the effective file limit
pub fn discover_swift_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    let path = dir_path.display().to_string();
    match fs::metadata(dir_path) {
        Err(_) => return Err(log_batch_error(BatchError::DirectoryNotFound { path })),
        Ok(metadata) if !metadata.is_dir() => {
            return Err(log_batch_error(BatchError::NotADirectory { path }))
        }
        Ok(_) => {}
    }

    let limit = config.effective_max_files();
    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive, limit).map_err(log_batch_error)?;

    if files.is_empty() {
        return Err(log_batch_error(BatchError::NoFilesFound { path }));
    }
    if files.len() >= limit {
        crate::log_warning!("File limit reached, remaining sources are skipped",
            "directory" => path,
            "limit" => limit
        );
    }

    crate::log_success!(codes::success::FILE_VALIDATION_PASSED, "Discovered Swift sources",
        "directory" => path,
        "count" => files.len(),
        "recursive" => config.recursive
    );
    Ok(files)
}

/// Depth-first over sorted entries, so files come out in path order
fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    recursive: bool,
    limit: usize,
) -> Result<(), BatchError> {
    let mut entries = fs::read_dir(dir_path)
        .and_then(|entries| entries.map(|entry| entry.map(|e| e.path())).collect::<Result<Vec<_>, _>>())
        .map_err(|e| BatchError::Traversal {
            message: format!("{}: {}", dir_path.display(), e),
        })?;
    entries.sort();

    for path in entries {
        if files.len() >= limit {
            break;
        }
        if path.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive, limit)?;
            }
        } else if path.is_file() && is_swift_path(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn log_batch_error(error: BatchError) -> BatchError {
    crate::log_error!(error.error_code(), "Batch discovery failed", "error" => error);
    error
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

type Outcome = Result<PipelineResult, PipelineError>;

/// Files handed out by index to whichever worker asks next
struct WorkQueue<'a> {
    files: &'a [PathBuf],
    next: AtomicUsize,
    stop: AtomicBool,
    fail_fast: bool,
    progress: bool,
}

impl<'a> WorkQueue<'a> {
    fn new(files: &'a [PathBuf], config: &BatchConfig) -> Self {
        Self {
            files,
            next: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            fail_fast: config.fail_fast,
            progress: config.progress_reporting,
        }
    }

    /// Lexes files until the queue is empty or a fail-fast stop is raised.
    /// The index of a file in the queue is its `file_id`.
    fn drain(&self, tables: &Arc<LexerTables>) -> Vec<(usize, Outcome)> {
        let mut done = Vec::new();

        while !self.stop.load(Ordering::Relaxed) {
            let file_id = self.next.fetch_add(1, Ordering::Relaxed);
            let Some(file_path) = self.files.get(file_id) else {
                break;
            };
            if self.progress {
                println!("[{}/{}] {}", file_id + 1, self.files.len(), file_path.display());
            }

            let outcome = pipeline::run(file_path, Arc::clone(tables), file_id);
            if let Err(error) = &outcome {
                record_failure_event(file_path, file_id, error);
                if self.fail_fast && !self.stop.swap(true, Ordering::Relaxed) {
                    crate::log_warning!("Stopping batch after first failure",
                        "file" => file_path.display()
                    );
                }
            }
            done.push((file_id, outcome));
        }

        done
    }
}

/// Lexes `files` on `threads` workers (the caller's thread when 1), in file order
fn lex_files(
    files: &[PathBuf],
    config: &BatchConfig,
    tables: &Arc<LexerTables>,
) -> Result<BatchResults, BatchError> {
    let started = Instant::now();
    let threads = config.effective_threads().min(files.len()).max(1);
    let queue = WorkQueue::new(files, config);

    let mut outcomes = if threads == 1 {
        queue.drain(tables)
    } else {
        crate::log_debug!("Spawning batch workers",
            "files" => files.len(),
            "threads" => threads
        );
        let queue = &queue;
        let joined = thread::scope(|scope| {
            let workers: Vec<_> = (0..threads)
                .map(|_| scope.spawn(move || queue.drain(tables)))
                .collect();
            workers.into_iter().map(|worker| worker.join()).collect::<Vec<_>>()
        });

        let mut outcomes = Vec::with_capacity(files.len());
        for worker in joined {
            outcomes.extend(worker.map_err(|_| {
                log_batch_error(BatchError::WorkerPanicked {
                    message: "a worker thread panicked while lexing".to_string(),
                })
            })?);
        }
        outcomes
    };
    outcomes.sort_by_key(|(file_id, _)| *file_id);

    let mut results = BatchResults::new();
    results.files_discovered = files.len();
    for (file_id, outcome) in outcomes {
        let file_path = files[file_id].clone();
        match outcome {
            Ok(result) => results.add_success(file_path, result),
            Err(error) => results.add_failure(file_path, error),
        }
    }
    results.processing_duration = started.elapsed();

    log_batch_complete(&results, threads);
    Ok(results)
}

fn record_failure_event(file_path: &Path, file_id: usize, error: &PipelineError) {
    crate::log_error!(error.error_code(), "File lexing failed",
        "file" => file_path.display(),
        "file_id" => file_id,
        "error" => error
    );
}

fn log_batch_complete(results: &BatchResults, threads: usize) {
    crate::log_success!(codes::success::BATCH_PROCESSING_COMPLETE, "Batch lexing completed",
        "lexed" => results.files_processed,
        "ok" => results.success_count(),
        "failed" => results.failure_count(),
        "tokens" => results.total_tokens(),
        "threads" => threads,
        "elapsed_ms" => results.processing_duration.as_millis()
    );
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Built-in vocabulary and default configuration
pub fn process_directory(dir_path: &Path) -> Result<BatchResults, BatchError> {
    process_directory_with_config(dir_path, &BatchConfig::default())
}

pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    process_directory_with_tables(dir_path, config, LexerTables::builtin())
}

/// Every file is lexed against the same `tables`
pub fn process_directory_with_tables(
    dir_path: &Path,
    config: &BatchConfig,
    tables: Arc<LexerTables>,
) -> Result<BatchResults, BatchError> {
    crate::log_info!("Starting batch lexing",
        "directory" => dir_path.display(),
        "threads" => config.effective_threads()
    );
    let files = discover_swift_files(dir_path, config)?;
    lex_files(&files, config, &tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_processor::FileProcessorError;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn sequential() -> BatchConfig {
        BatchConfig {
            max_threads: 1,
            ..BatchConfig::default()
        }
    }

    fn threaded(max_threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_discovery_walks_subdirectories() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("Sources")).unwrap();
        fs::write(root.join("b.swift"), "let b = 2").unwrap();
        fs::write(root.join("Sources/a.swift"), "let a = 1").unwrap();
        fs::write(root.join("Package.resolved"), "{}").unwrap();

        let files = discover_swift_files(root, &BatchConfig::default()).unwrap();
        assert_eq!(files, vec![root.join("Sources/a.swift"), root.join("b.swift")]);

        let flat = BatchConfig {
            recursive: false,
            ..BatchConfig::default()
        };
        let files = discover_swift_files(root, &flat).unwrap();
        assert_eq!(files, vec![root.join("b.swift")]);
    }

    #[test]
    fn test_max_files_keeps_the_first_paths() {
        let temp_dir = tempdir().unwrap();
        for name in ["c.swift", "a.swift", "b.swift"] {
            fs::write(temp_dir.path().join(name), "x").unwrap();
        }
        let config = BatchConfig {
            max_files: Some(2),
            ..BatchConfig::default()
        };
        let files = discover_swift_files(temp_dir.path(), &config).unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.swift"), temp_dir.path().join("b.swift")]
        );
    }

    #[test]
    fn test_discovery_errors() {
        let temp_dir = tempdir().unwrap();

        let result = discover_swift_files(&temp_dir.path().join("missing"), &BatchConfig::default());
        assert_matches!(result, Err(BatchError::DirectoryNotFound { .. }));

        let file = temp_dir.path().join("main.swift");
        fs::write(&file, "x").unwrap();
        let result = discover_swift_files(&file, &BatchConfig::default());
        assert_matches!(result, Err(BatchError::NotADirectory { .. }));

        let empty = tempdir().unwrap();
        let result = discover_swift_files(empty.path(), &BatchConfig::default());
        assert_matches!(result, Err(ref error @ BatchError::NoFilesFound { .. }) if error.error_code().as_str() == "E063");
    }

    #[test]
    fn test_sequential_processing() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("ok.swift"), "let a = 1").unwrap();
        fs::write(temp_dir.path().join("bad.swift"), "let b = 1 $ 2").unwrap();

        let results = process_directory_with_config(temp_dir.path(), &sequential()).unwrap();
        assert_eq!(results.files_discovered, 2);
        assert_eq!(results.success_count(), 2);
        assert_eq!(results.total_invalid(), 1);
        assert_eq!(results.success_rate(), 1.0);
        assert!(results.summary().starts_with("2 files processed: 2 ok, 0 failed"));
    }

    #[test]
    fn test_threads_match_sequential_in_file_order() {
        let temp_dir = tempdir().unwrap();
        for i in 0..12 {
            let source = format!("let value{} = {}\n/* note\n{} */", i, i, i);
            fs::write(temp_dir.path().join(format!("file{:02}.swift", i)), source).unwrap();
        }

        let threaded = process_directory_with_config(temp_dir.path(), &threaded(4)).unwrap();
        let sequential = process_directory_with_config(temp_dir.path(), &sequential()).unwrap();

        assert_eq!(threaded.success_count(), 12);
        assert_eq!(threaded.total_tokens(), sequential.total_tokens());
        for ((left_path, left), (right_path, right)) in
            threaded.successful_files.iter().zip(&sequential.successful_files)
        {
            assert_eq!(left_path, right_path);
            assert_eq!(left.output, right.output);
        }
    }

    #[test]
    fn test_more_threads_than_files() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("only.swift"), "let x = 1").unwrap();

        let results = process_directory_with_config(temp_dir.path(), &threaded(8)).unwrap();
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.success_count(), 1);
    }

    #[test]
    fn test_fail_fast_stops_after_first_failure() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.swift"), "x".repeat(10)).unwrap();
        fs::write(temp_dir.path().join("b.swift"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(temp_dir.path().join("c.swift"), "let c = 3").unwrap();

        let config = BatchConfig {
            fail_fast: true,
            ..sequential()
        };
        let results = process_directory_with_config(temp_dir.path(), &config).unwrap();
        assert_eq!(results.success_count(), 1);
        assert_eq!(results.failure_count(), 1);
        assert_matches!(
            results.failed_files[0].1,
            PipelineError::FileProcessing(FileProcessorError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_failures_do_not_stop_a_normal_batch() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.swift"), [0xff]).unwrap();
        fs::write(temp_dir.path().join("b.swift"), "let b = 2").unwrap();

        let results = process_directory_with_config(temp_dir.path(), &threaded(2)).unwrap();
        assert_eq!(results.files_processed, 2);
        assert_eq!(results.failed_files[0].0, temp_dir.path().join("a.swift"));
        assert_eq!(results.successful_files[0].0, temp_dir.path().join("b.swift"));
    }

    #[test]
    fn test_process_directory_defaults() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("main.swift"), "print(1)").unwrap();

        let results = process_directory(temp_dir.path()).unwrap();
        assert_eq!(results.success_count(), 1);
        assert_eq!(results.total_tokens(), 4);
    }

    #[test]
    fn test_batch_config_limits() {
        let config = BatchConfig {
            max_threads: 0,
            max_files: Some(usize::MAX),
            ..BatchConfig::default()
        };
        assert_eq!(config.effective_threads(), 1);
        assert_eq!(config.effective_max_files(), MAX_FILES_PER_BATCH);
        assert!(BatchConfig::default().recursive);
    }
}
