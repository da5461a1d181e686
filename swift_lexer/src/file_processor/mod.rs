//! Source file loading with compile-time size limits

mod processor;

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::log_debug;
use std::path::Path;

pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, SWIFT_EXTENSION,
};

/// Reads `file_path` with preferences taken from the environment
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
) -> Result<FileProcessingResult, FileProcessorError> {
    create_processor_from_preferences(&FileProcessorPreferences::default()).process_file(file_path)
}

pub fn create_processor() -> FileProcessor {
    FileProcessor::new()
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

pub fn is_swift_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SWIFT_EXTENSION))
}

pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

/// Startup check that every file processing code has registry metadata
pub fn init_file_processor_logging() -> Result<(), String> {
    let codes_to_check = [
        crate::logging::codes::file_processing::FILE_NOT_FOUND,
        crate::logging::codes::file_processing::INVALID_EXTENSION,
        crate::logging::codes::file_processing::FILE_TOO_LARGE,
        crate::logging::codes::file_processing::PERMISSION_DENIED,
        crate::logging::codes::file_processing::INVALID_ENCODING,
        crate::logging::codes::file_processing::IO_ERROR,
        crate::logging::codes::file_processing::INVALID_PATH,
        crate::logging::codes::file_processing::TOO_MANY_LINES,
    ];

    for code in &codes_to_check {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("File processor limits",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD,
        "max_line_count" => MAX_LINE_COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swift_path_detection() {
        assert!(is_swift_path(Path::new("Sources/App/main.swift")));
        assert!(is_swift_path(Path::new("Legacy.SWIFT")));
        assert!(!is_swift_path(Path::new("Package.resolved")));
        assert!(!is_swift_path(Path::new("swift")));
    }

    #[test]
    fn test_init_logging() {
        assert!(init_file_processor_logging().is_ok());
    }

    #[test]
    fn test_default_processor() {
        let processor = create_processor();
        assert!(!processor.require_swift_extension);
        assert_eq!(get_max_file_size(), FileProcessor::max_file_size());
    }
}
