//! Runtime preferences read from `SWIFT_LEXER_*` environment variables
//!
//! Unset or unparsable variables fall back to the defaults below. Limits
//! that protect the process live in `compile_time` instead and cannot be
//! changed here.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub mod env_vars {
    pub const REQUIRE_SWIFT_EXTENSION: &str = "SWIFT_LEXER_REQUIRE_SWIFT_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "SWIFT_LEXER_ENABLE_PERFORMANCE_LOGGING";
    pub const LOG_NON_SWIFT_PROCESSING: &str = "SWIFT_LEXER_LOG_NON_SWIFT_PROCESSING";

    pub const LEXICAL_DETAILED_METRICS: &str = "SWIFT_LEXER_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_INCLUDE_TRIVIA: &str = "SWIFT_LEXER_LEXICAL_INCLUDE_TRIVIA";
    pub const LEXICAL_TRACK_OPERATORS: &str = "SWIFT_LEXER_LEXICAL_TRACK_OPERATORS";
    pub const LEXICAL_LOG_RECOVERY: &str = "SWIFT_LEXER_LEXICAL_LOG_RECOVERY";

    pub const LOGGING_USE_STRUCTURED: &str = "SWIFT_LEXER_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "SWIFT_LEXER_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "SWIFT_LEXER_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "SWIFT_LEXER_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "SWIFT_LEXER_LOGGING_INCLUDE_FILE_CONTEXT";
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Reject files without a .swift extension
    pub require_swift_extension: bool,
    pub enable_performance_logging: bool,
    /// Debug note when a non-.swift file is read anyway
    pub log_non_swift_processing: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_swift_extension: env_or(env_vars::REQUIRE_SWIFT_EXTENSION, false),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
            log_non_swift_processing: env_or(env_vars::LOG_NON_SWIFT_PROCESSING, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Per-class token metrics; off leaves only totals
    pub collect_detailed_metrics: bool,
    /// Count whitespace and tab runs in the metrics
    pub include_trivia_in_counts: bool,
    pub track_operator_patterns: bool,
    /// Debug event for every recovered fragment
    pub log_recovery_events: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
            include_trivia_in_counts: env_or(env_vars::LEXICAL_INCLUDE_TRIVIA, false),
            track_operator_patterns: env_or(env_vars::LEXICAL_TRACK_OPERATORS, false),
            log_recovery_events: env_or(env_vars::LEXICAL_LOG_RECOVERY, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// One JSON object per event instead of text lines
    pub use_structured_logging: bool,
    pub enable_console_logging: bool,
    /// Raised to the compile-time floor when that is stricter
    pub min_log_level: LogLevel,
    /// Per-file error listing after single-file and batch runs
    pub enable_cargo_style_output: bool,
    /// Tag events with the file being lexed
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env_or(env_vars::LOGGING_MIN_LEVEL, LogLevel::Info),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}
