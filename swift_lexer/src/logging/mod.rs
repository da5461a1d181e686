//! Global logging for the lexer
//!
//! A process-wide service installed once at startup, a per-thread file
//! context that tags every event with the file being lexed, and a collector
//! that groups errors per file for the cargo-style summary.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::utils::Position;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::OnceLock;

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<LoggingService> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<ErrorCollector> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    GLOBAL_LOGGER
        .set(LoggingService::with_config())
        .map_err(|_| "Global logger already initialized")?;
    GLOBAL_ERROR_COLLECTOR
        .set(ErrorCollector::new())
        .map_err(|_| "Global error collector already initialized")?;

    log_success_with_context(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
        vec![],
    );
    Ok(())
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get()
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR.get()
}

/// Run `f` with events tagged by `file_path`; the context is cleared afterwards
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = FILE_CONTEXT.with(|ctx| {
        ctx.replace(Some(FileProcessingContext { file_path, file_id }))
    });
    let result = f();
    FILE_CONTEXT.with(|ctx| ctx.replace(previous));
    result
}

pub fn current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Adds `file` and `file_id` context when a file context is set and enabled
pub fn with_current_file(event: LogEvent) -> LogEvent {
    if !config::include_file_context() {
        return event;
    }
    match current_file_context() {
        Some(file_ctx) => event
            .with_context("file", &file_ctx.file_path.display().to_string())
            .with_context("file_id", &file_ctx.file_id.to_string()),
        None => event,
    }
}

fn with_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    with_current_file(event)
}

/// Backs `log_error!`; also records into the collector under the current file
pub fn log_error_with_context(
    code: Code,
    message: &str,
    position: Option<Position>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(p) = position {
        event = event.with_position(p);
    }
    let event = with_pairs(event, context);

    if let (Some(file_ctx), Some(collector)) =
        (current_file_context(), try_get_global_error_collector())
    {
        collector.record_event(&file_ctx.file_path, event.clone());
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Backs `log_warning!`; warnings are collected per file like errors
pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    let event = with_pairs(LogEvent::warning(message), context);

    if let (Some(file_ctx), Some(collector)) =
        (current_file_context(), try_get_global_error_collector())
    {
        collector.record_event(&file_ctx.file_path, event.clone());
    }
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(with_pairs(LogEvent::success(code, message), context));
    }
}

pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(with_pairs(LogEvent::info(message), context));
    }
}

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(ErrorCollector::get_summary)
        .unwrap_or_default()
}

/// Prints the collected errors to stderr when cargo-style output is enabled
pub fn print_cargo_style_summary() {
    if !config::use_cargo_style_output() {
        return;
    }
    if let Some(collector) = try_get_global_error_collector() {
        let output = collector.format_cargo_style();
        if !output.is_empty() {
            eprintln!("{}", output);
        }
    }
}
