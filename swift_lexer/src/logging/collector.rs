//! Per-file error and warning collection for cargo-style summaries

use super::events::LogEvent;
use crate::config::compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// File the current thread is lexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Files with at least one collected event
    pub total_files: usize,
    pub files_with_errors: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

/// Shared by every worker of a batch
#[derive(Default)]
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.file_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Keeps `MAX_LOG_EVENTS_PER_FILE` events per file plus one overflow
    /// warning, and drops everything once `LOG_BUFFER_SIZE` events are held
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = self.events();
        if events.values().map(Vec::len).sum::<usize>() >= LOG_BUFFER_SIZE {
            return;
        }

        let file_events = events.entry(file_path.to_path_buf()).or_default();
        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.events().get(file_path).cloned().unwrap_or_default()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let mut summary = ProcessingSummary::default();

        for file_events in self.events().values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            summary.total_files += 1;
            summary.files_with_errors += usize::from(errors > 0);
            summary.files_with_warnings += usize::from(errors == 0 && warnings > 0);
            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    /// Errors and warnings grouped by file, followed by totals
    pub fn format_cargo_style(&self) -> String {
        let mut output = String::new();

        for (file_path, events) in self.events().iter() {
            let mut reported = events
                .iter()
                .filter(|e| e.is_error() || e.is_warning())
                .peekable();
            if reported.peek().is_none() {
                continue;
            }

            output.push_str(&format!("Checking {}...\n", file_path.display()));
            for event in reported {
                push_event(&mut output, file_path, event);
            }
            output.push('\n');
        }

        let summary = self.get_summary();
        if summary.total_errors > 0 {
            output.push_str(&format!("\nTotal errors: {}\n", summary.total_errors));
        }
        if summary.total_warnings > 0 {
            output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
        }
        output
    }
}

fn push_event(output: &mut String, file_path: &Path, event: &LogEvent) {
    let label = if event.is_error() { "error" } else { "warning" };
    let location = event
        .position
        .map(|p| format!(" --> {}:{}", file_path.display(), p.human()))
        .unwrap_or_default();
    output.push_str(&format!("{}[{}]: {}{}\n", label, event.code, event.message, location));

    if let Some(metadata) = event.metadata() {
        output.push_str(&format!(
            "  = severity: {}, category: {}\n",
            metadata.severity.as_str(),
            metadata.category
        ));
    }
    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
    if let Some(metadata) = event.metadata() {
        output.push_str(&format!("  = help: {}\n", metadata.recommended_action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::Position;

    #[test]
    fn test_processing_summary() {
        let collector = ErrorCollector::new();

        collector.record_event(
            Path::new("a.swift"),
            LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "Error"),
        );
        collector.record_event(Path::new("b.swift"), LogEvent::warning("Warning"));
        collector.record_event(Path::new("c.swift"), LogEvent::info("ok"));

        assert_eq!(
            collector.get_summary(),
            ProcessingSummary {
                total_files: 3,
                files_with_errors: 1,
                files_with_warnings: 1,
                total_errors: 1,
                total_warnings: 1,
            }
        );
    }

    #[test]
    fn test_per_file_limit_adds_one_overflow_warning() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("noisy.swift");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 10 {
            collector.record_event(&file_path, LogEvent::info("event"));
        }

        let events = collector.get_file_events(&file_path);
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert!(events.last().unwrap().is_warning());
    }

    #[test]
    fn test_cargo_style_output_uses_one_based_location() {
        let collector = ErrorCollector::new();

        collector.record_event(
            Path::new("main.swift"),
            LogEvent::error(codes::lexical::UNCLOSED_COMMENT, "Comment never closed")
                .with_position(Position::new(0, 4))
                .with_context("file", "main.swift")
                .with_context("depth", "2"),
        );
        collector.record_event(
            Path::new("main.swift"),
            LogEvent::warning("Token limit reached"),
        );

        let output = collector.format_cargo_style();
        assert!(output.contains("Checking main.swift..."));
        assert!(output.contains("error[E024]: Comment never closed --> main.swift:1:5"));
        assert!(output.contains("  = severity: Medium, category: Lexical"));
        assert!(output.contains("  = depth: 2"));
        assert!(output.contains("  = help: Add the closing */"));
        assert!(!output.contains("  = file:"));
        assert!(output.contains("warning[W000]: Token limit reached"));
        assert!(output.contains("Total errors: 1"));
        assert!(output.contains("Total warnings: 1"));
    }

    #[test]
    fn test_quiet_files_are_skipped() {
        let collector = ErrorCollector::new();
        collector.record_event(Path::new("clean.swift"), LogEvent::info("ok"));
        assert!(collector.format_cargo_style().is_empty());
    }
}
