//! Reads one source file into memory after path, size and extension checks

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_info, log_success};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

pub const SWIFT_EXTENSION: &str = "swift";

#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("No such file: {path}")]
    FileNotFound { path: String },

    #[error("Expected a .swift file, got extension {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("{size} bytes exceeds the {max_size} byte file limit")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Cannot read {path}: permission denied")]
    PermissionDenied { path: String },

    #[error("{path} is not UTF-8 (first bad byte at offset {offset})")]
    InvalidEncoding { path: String, offset: usize },

    #[error("{message}")]
    IoError { message: String },

    #[error("Not a regular file: {path:?}")]
    InvalidPath { path: String },

    #[error("{lines} lines exceeds the {max_lines} line limit")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        use codes::file_processing as fp;
        match self {
            Self::FileNotFound { .. } => fp::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => fp::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => fp::FILE_TOO_LARGE,
            Self::PermissionDenied { .. } => fp::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => fp::INVALID_ENCODING,
            Self::IoError { .. } => fp::IO_ERROR,
            Self::InvalidPath { .. } => fp::INVALID_PATH,
            Self::TooManyLines { .. } => fp::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn io(error: io::Error, path: &Path, doing: &str) -> Self {
        let path_text = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound { path: path_text },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path: path_text },
            _ => Self::IoError {
                message: format!("Failed to {} {}: {}", doing, path_text, error),
            },
        }
    }

    /// Logs the error under its own code and hands it back for `Err(...)`
    fn logged(self, message: &str, path: &str) -> Self {
        log_error!(self.error_code(), message,
            "path" => path,
            "reason" => self
        );
        self
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_swift_file: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    /// Stats `path`; `line_count` stays 0 until the content is read
    fn inspect(path: PathBuf) -> Result<Self, FileProcessorError> {
        let stat = fs::metadata(&path)
            .map_err(|e| FileProcessorError::io(e, &path, "stat"))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        Ok(Self {
            is_swift_file: extension.as_deref() == Some(SWIFT_EXTENSION),
            size: stat.len(),
            modified: stat.modified().ok(),
            line_count: 0,
            extension,
            path,
        })
    }

    /// Above the compile-time large file threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// Source text plus what was learned while reading it
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    /// Physical lines without terminators; `\r\n` and `\n` both end a line
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.source.lines()
    }

    pub fn is_blank(&self) -> bool {
        self.source.chars().all(char::is_whitespace)
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_swift_extension: bool,
    /// Adds read timing to the success event
    pub log_timing: bool,
    pub log_non_swift_processing: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_swift_extension: false,
            log_timing: true,
            log_non_swift_processing: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_swift_extension: prefs.require_swift_extension,
            log_timing: prefs.enable_performance_logging,
            log_non_swift_processing: prefs.log_non_swift_processing,
        }
    }

    pub fn with_swift_extension_required(mut self, required: bool) -> Self {
        self.require_swift_extension = required;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn max_line_count() -> usize {
        MAX_LINE_COUNT
    }

    /// Resolve, stat, check, then read and decode `file_path`
    pub fn process_file<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let started = Instant::now();
        let shown = file_path.as_ref().display().to_string();

        let path = resolve(file_path.as_ref()).map_err(|e| e.logged("Cannot open source file", &shown))?;
        let mut metadata = FileMetadata::inspect(path)
            .map_err(|e| e.logged("Cannot stat source file", &shown))?;
        self.check(&metadata)
            .map_err(|e| e.logged("Source file rejected", &shown))?;

        let source = decode(&metadata.path)
            .map_err(|e| e.logged("Cannot read source file", &shown))?;
        metadata.line_count = source.lines().count();
        if metadata.line_count > MAX_LINE_COUNT {
            let error = FileProcessorError::TooManyLines {
                lines: metadata.line_count,
                max_lines: MAX_LINE_COUNT,
            };
            return Err(error.logged("Source file rejected", &shown));
        }

        if !metadata.is_swift_file && self.log_non_swift_processing {
            log_debug!("Reading a file without the .swift extension",
                "file" => shown,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
        }
        if metadata.is_large_file() {
            log_info!("Large source file", "file" => shown, "bytes" => metadata.size);
        }

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: started.elapsed(),
        };
        self.report(&result, &shown);
        Ok(result)
    }

    fn check(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }
        if self.require_swift_extension && !metadata.is_swift_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            });
        }
        Ok(())
    }

    fn report(&self, result: &FileProcessingResult, shown: &str) {
        let timing = if self.log_timing {
            format!("{:.3}", result.processing_duration.as_secs_f64() * 1000.0)
        } else {
            "off".to_string()
        };
        log_success!(codes::success::FILE_PROCESSING_SUCCESS, "Source file read",
            "file" => shown,
            "bytes" => result.metadata.size,
            "lines" => result.metadata.line_count,
            "duration_ms" => timing
        );
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical path of an existing regular file
fn resolve(file_path: &Path) -> Result<PathBuf, FileProcessorError> {
    let invalid = || FileProcessorError::InvalidPath {
        path: file_path.display().to_string(),
    };
    if file_path.as_os_str().is_empty() {
        return Err(invalid());
    }
    let path = file_path
        .canonicalize()
        .map_err(|e| FileProcessorError::io(e, file_path, "resolve"))?;
    if !path.is_file() {
        return Err(invalid());
    }
    Ok(path)
}

/// Whole-file read, rejecting anything that is not UTF-8
fn decode(path: &Path) -> Result<String, FileProcessorError> {
    let bytes = fs::read(path).map_err(|e| FileProcessorError::io(e, path, "read"))?;
    String::from_utf8(bytes).map_err(|e| FileProcessorError::InvalidEncoding {
        path: path.display().to_string(),
        offset: e.utf8_error().valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn write(dir: &tempfile::TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_reads_swift_source() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "main.swift", "let x = 1\nprint(x)\n");

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.size, 19);
        assert!(result.metadata.is_swift_file);
        assert_eq!(result.metadata.path, path.canonicalize().unwrap());
        assert!(!result.is_blank());
    }

    #[test]
    fn test_crlf_lines_are_stripped() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "windows.swift", "let a = 1\r\nlet b = 2\r\n");

        let result = FileProcessor::new().process_file(&path).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines, vec!["let a = 1", "let b = 2"]);
    }

    #[test]
    fn test_empty_file_is_valid() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "empty.swift", "");

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert_eq!(result.metadata.line_count, 0);
        assert!(result.is_blank());
        assert_eq!(result.lines().count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let result = FileProcessor::new().process_file("nonexistent.swift");
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directories_and_empty_paths_are_rejected() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));

        let result = FileProcessor::new().process_file("");
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_swift_extension_can_be_required() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "notes.txt", "content");

        let result = FileProcessor::new()
            .with_swift_extension_required(true)
            .process_file(&path);
        assert_matches!(
            result,
            Err(FileProcessorError::InvalidExtension { extension: Some(ext) }) if ext == "txt"
        );

        assert!(FileProcessor::new().process_file(&path).is_ok());
    }

    #[test]
    fn test_uppercase_extension_counts_as_swift() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "Main.SWIFT", "import Foundation");

        let result = FileProcessor::new()
            .with_swift_extension_required(true)
            .process_file(&path)
            .unwrap();
        assert!(result.metadata.is_swift_file);
    }

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "binary.swift", [0x66, 0x6f, 0xff, 0xfe]);

        let result = FileProcessor::new().process_file(&path);
        assert_matches!(result, Err(FileProcessorError::InvalidEncoding { offset: 2, .. }));
    }

    #[test]
    fn test_too_many_lines() {
        let dir = tempdir().unwrap();
        let path = write(&dir, "many_lines.swift", "x\n".repeat(MAX_LINE_COUNT + 1));

        let result = FileProcessor::new().process_file(&path);
        assert_matches!(
            result,
            Err(FileProcessorError::TooManyLines { lines, max_lines })
                if lines == MAX_LINE_COUNT + 1 && max_lines == MAX_LINE_COUNT
        );
    }

    #[test]
    fn test_error_metadata() {
        let missing = FileProcessorError::FileNotFound {
            path: "main.swift".to_string(),
        };
        assert_eq!(missing.error_code().as_str(), "E005");
        assert_eq!(missing.category(), "FileProcessing");
        assert_eq!(missing.severity(), "Medium");
        assert!(missing.requires_halt());

        let extension = FileProcessorError::InvalidExtension { extension: None };
        assert!(extension.is_recoverable());
    }

    #[test]
    fn test_preferences_map_onto_processor() {
        let prefs = FileProcessorPreferences {
            require_swift_extension: true,
            enable_performance_logging: false,
            log_non_swift_processing: false,
        };

        let processor = FileProcessor::from_preferences(&prefs);
        assert!(processor.require_swift_extension);
        assert!(!processor.log_timing);
        assert!(!processor.log_non_swift_processing);
        assert!(!processor.with_swift_extension_required(false).require_swift_extension);
    }
}
