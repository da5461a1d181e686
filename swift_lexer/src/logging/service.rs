//! Logging service and its output sinks

use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level filter in front of any number of sinks
pub struct LoggingService {
    sinks: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            sinks: Vec::new(),
            min_level,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn Logger>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Console sink, text or JSON, when the preferences enable one
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let service = Self::new(min_level);

        if !config::use_console_logging() {
            return service;
        }
        if config::use_structured_logging() {
            service.with_sink(Arc::new(StructuredLogger))
        } else {
            service.with_sink(Arc::new(ConsoleLogger))
        }
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Messages longer than the compile-time limit are truncated here
    pub fn log_event(&self, mut event: LogEvent) {
        if !self.should_log(event.level) {
            return;
        }
        event.message = config::clamp_message(&event.message);
        for sink in &self.sinks {
            sink.log(&event);
        }
    }
}

/// Text lines; errors go to stderr, with details when they halt a run
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error if event.requires_halt() => eprintln!("{}", event.format_detailed()),
            LogLevel::Error => eprintln!("{}", event.format()),
            _ => println!("{}", event.format()),
        }
    }
}

/// One JSON object per line
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}
