//! Log entry structure

use super::log_args::LogArgs;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<LogArgs>,
}

/// Entries carry exactly one level: combinations collapse to the most severe bit,
/// an empty set becomes info.
fn canonical_level(level: LogLevel) -> LogLevel {
    if level.is_empty() {
        return LogLevel::INFO;
    }
    level.iter().last().unwrap_or(LogLevel::INFO)
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().hyphenated().to_string().to_uppercase(),
            timestamp: Utc::now(),
            duration: None,
            level: canonical_level(level),
            message: message.into(),
            stack: None,
            args: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::INFO, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::WARNING, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::ERROR, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(LogLevel::FATAL, message)
    }

    /// Attach arguments; empty argument sets are stored as absent
    #[must_use]
    pub fn with_args(mut self, args: impl Into<Option<LogArgs>>) -> Self {
        self.args = args.into().filter(|args| !args.is_empty());
        self
    }

    /// Capture the current stack trace into the entry
    #[must_use]
    pub fn with_stack(mut self) -> Self {
        self.stack = Some(Backtrace::force_capture().to_string());
        self
    }

    /// Restart the entry clock, discarding any measured duration
    pub fn start_watch(&mut self) {
        self.timestamp = Utc::now();
        self.duration = None;
    }

    /// Record the time elapsed since construction or the last `start_watch`
    pub fn stop_watch(&mut self) {
        self.duration = Some((Utc::now() - self.timestamp).to_std().unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_has_id_and_level() {
        let entry = LogEntry::warning("disk almost full");
        assert_eq!(entry.level, LogLevel::WARNING);
        assert_eq!(entry.id.len(), 36);
        assert_eq!(entry.id, entry.id.to_uppercase());
        assert!(entry.stack.is_none());
        assert!(entry.duration.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = LogEntry::info("a");
        let b = LogEntry::info("b");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_level_is_canonicalized() {
        assert_eq!(LogEntry::new(LogLevel::ALL, "x").level, LogLevel::FATAL);
        assert_eq!(
            LogEntry::new(LogLevel::INFO | LogLevel::ERROR, "x").level,
            LogLevel::ERROR
        );
        assert_eq!(LogEntry::new(LogLevel::default(), "x").level, LogLevel::INFO);
    }

    #[test]
    fn test_empty_args_are_absent() {
        let entry = LogEntry::info("x").with_args(LogArgs::new());
        assert!(entry.args.is_none());

        let entry = LogEntry::info("x").with_args(LogArgs::new().with_field("k", 1));
        assert_eq!(entry.args.map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_watch_measures_duration() {
        let mut entry = LogEntry::info("timed");
        entry.start_watch();
        std::thread::sleep(Duration::from_millis(5));
        entry.stop_watch();
        assert!(entry.duration.unwrap() >= Duration::from_millis(5));
    }

    #[test]
    fn test_with_stack() {
        let entry = LogEntry::error("boom").with_stack();
        assert!(entry.stack.is_some());
    }
}
