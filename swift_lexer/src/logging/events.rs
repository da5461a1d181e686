//! Log events and their text and JSON renderings

use super::codes::{self, Code, ErrorMetadata};
use crate::utils::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Ordered from most to least severe, so `level <= min_level` passes a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Numeric floor as written in the build profile
    pub fn from_floor(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_ascii_lowercase().as_str() {
            "error" | "0" => Ok(LogLevel::Error),
            "warning" | "warn" | "1" => Ok(LogLevel::Warning),
            "info" | "2" => Ok(LogLevel::Info),
            "debug" | "3" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub position: Option<Position>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            position: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info event carrying a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn debug_with_code(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Debug, code, message)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    /// Registry entry; `None` for success, warning and debug codes
    pub fn metadata(&self) -> Option<&'static ErrorMetadata> {
        codes::get_error_metadata(self.code.as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    /// `[LEVEL] CODE - message at row:col`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} - {}", self.level.as_str(), self.code, self.message);
        if let Some(position) = self.position {
            line.push_str(&format!(" at {}:{}", position.row, position.column));
        }
        line
    }

    /// `format()` plus registry metadata and context, one item per line
    pub fn format_detailed(&self) -> String {
        let mut output = self.format();
        output.push_str(&format!("\n  Category: {}", self.category()));
        output.push_str(&format!("\n  Severity: {}", self.severity()));

        if let Some(metadata) = self.metadata() {
            if self.is_error() {
                output.push_str(&format!("\n  Recoverable: {}", metadata.recoverable()));
                output.push_str(&format!("\n  Requires halt: {}", metadata.requires_halt()));
            }
            output.push_str(&format!("\n  Description: {}", metadata.description));
            output.push_str(&format!("\n  Recommended action: {}", metadata.recommended_action));
        }

        if !self.context.is_empty() {
            output.push_str("\n  Context:");
            for (key, value) in &self.context {
                output.push_str(&format!("\n    {}: {}", key, value));
            }
        }
        output
    }

    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if let (true, Some(metadata)) = (self.is_error(), self.metadata()) {
            json["error_metadata"] = serde_json::json!({
                "recoverable": metadata.recoverable(),
                "requires_halt": metadata.requires_halt(),
                "description": metadata.description,
                "recommended_action": metadata.recommended_action,
            });
        }
        if let Some(position) = self.position {
            json["position"] = serde_json::json!({
                "row": position.row,
                "column": position.column,
            });
        }
        if !self.context.is_empty() {
            json["context"] = serde_json::json!(self.context);
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("error".parse(), Ok(LogLevel::Error));
        assert_eq!("ERROR".parse(), Ok(LogLevel::Error));
        assert_eq!("warn".parse(), Ok(LogLevel::Warning));
        assert_eq!("3".parse(), Ok(LogLevel::Debug));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::from_floor(2), LogLevel::Info);
        assert_eq!(LogLevel::from_floor(9), LogLevel::Debug);
    }

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "File not found");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E005");
        assert_eq!(event.category(), "FileProcessing");
    }

    #[test]
    fn test_success_events_have_no_metadata() {
        let event = LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "Tokenized");

        assert_eq!(event.level, LogLevel::Info);
        assert!(event.metadata().is_none());
        assert_eq!(event.category(), "Unknown");
    }

    #[test]
    fn test_event_formatting_with_position() {
        let event = LogEvent::error(codes::lexical::MALFORMED_NUMBER, "Malformed numeric literal")
            .with_position(Position::new(3, 7));

        assert_eq!(
            event.format(),
            "[ERROR] E022 - Malformed numeric literal at 3:7"
        );
    }

    #[test]
    fn test_event_metadata() {
        let event = LogEvent::error(codes::system::INTERNAL_ERROR, "System failure");

        assert_eq!(event.severity(), "Critical");
        assert_eq!(event.category(), "System");
        assert!(!event.is_recoverable());
        assert!(event.requires_halt());
    }

    #[test]
    fn test_warning_and_debug_defaults() {
        assert_eq!(LogEvent::warning("w").code.as_str(), "W000");
        assert_eq!(LogEvent::debug("d").code.as_str(), "D000");
        let coded = LogEvent::debug_with_code(codes::lexical::INVALID_TOKEN, "recovered");
        assert_eq!(coded.level, LogLevel::Debug);
        assert_eq!(coded.category(), "Lexical");
    }

    #[test]
    fn test_detailed_formatting() {
        let event = LogEvent::error(codes::configuration::UNKNOWN_LITERAL, "Unknown literal")
            .with_context("literal", "lett");
        let detailed = event.format_detailed();

        assert!(detailed.starts_with("[ERROR] E030 - Unknown literal"));
        assert!(detailed.contains("\n  Category: Configuration"));
        assert!(detailed.contains("\n  Requires halt: true"));
        assert!(detailed.contains("\n    literal: lett"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_processing::PERMISSION_DENIED, "Access denied")
            .with_context("file", "main.swift")
            .with_position(Position::new(0, 2));

        let json: serde_json::Value = serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["code"], "E009");
        assert_eq!(json["error_metadata"]["requires_halt"], true);
        assert_eq!(json["context"]["file"], "main.swift");
        assert_eq!(json["position"]["column"], 2);
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }
}
