//! Logging configuration: compile-time limits and runtime user preferences
//!
//! Buffer sizes and the verbosity floor come from `build.rs`. Everything
//! else is a runtime preference read once from the environment.

use super::events::LogLevel;
use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

fn preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

/// Level below which events are never dropped, fixed per build profile
pub fn get_floor_log_level() -> LogLevel {
    LogLevel::from_floor(SECURITY_MIN_LOG_LEVEL)
}

/// User preference, raised to the compile-time floor when it is stricter
pub fn get_min_log_level() -> LogLevel {
    preferences().min_log_level.max(get_floor_log_level())
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    preferences().enable_console_logging
}

pub fn use_cargo_style_output() -> bool {
    preferences().enable_cargo_style_output
}

pub fn include_file_context() -> bool {
    preferences().include_file_context
}

pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "Log buffer size {} outside 100..=100000",
            LOG_BUFFER_SIZE
        ));
    }
    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err("Max log events per file exceeds total buffer size".to_string());
    }
    if MAX_LOG_MESSAGE_LENGTH == 0 {
        return Err("Max log message length must be positive".to_string());
    }
    Ok(())
}

/// Truncate a message to the compile-time length limit on a char boundary
pub fn clamp_message(message: &str) -> String {
    match message.char_indices().nth(MAX_LOG_MESSAGE_LENGTH) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}
