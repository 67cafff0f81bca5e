//! Process-wide default manager
//!
//! Libraries that cannot thread a [`LogManager`] through their call sites can use
//! these free functions instead. The default manager is created on first use with
//! the default configuration and lives for the rest of the process, so its
//! workers are never joined; call [`shutdown`] before exit if pending entries
//! should be discarded deterministically.

use crate::core::{
    HandlerStats, LogArgs, LogEntry, LogHandler, LogLevel, LogManager, Result,
};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

static DEFAULT_MANAGER: OnceLock<LogManager> = OnceLock::new();

/// The process-wide manager, created on first access
pub fn default_manager() -> &'static LogManager {
    DEFAULT_MANAGER.get_or_init(LogManager::new)
}

pub fn enable() {
    default_manager().enable();
}

pub fn disable() {
    default_manager().disable();
}

pub fn enabled() -> bool {
    default_manager().enabled()
}

pub fn enable_stacktrace() {
    default_manager().enable_stacktrace();
}

pub fn disable_stacktrace() {
    default_manager().disable_stacktrace();
}

pub fn stacktrace_enabled() -> bool {
    default_manager().stacktrace_enabled()
}

pub fn register_handler(handler: Arc<dyn LogHandler>) -> Result<()> {
    default_manager().register_handler(handler)
}

pub fn register_handler_with_name(name: &str, handler: Arc<dyn LogHandler>) -> Result<()> {
    default_manager().register_handler_with_name(name, handler)
}

pub fn unregister_handler(name: &str) -> bool {
    default_manager().unregister_handler(name)
}

pub fn handler_stats(name: &str) -> Option<HandlerStats> {
    default_manager().handler_stats(name)
}

pub fn log(entry: impl Into<Arc<LogEntry>>) {
    default_manager().log(entry);
}

pub fn new_entry(
    level: LogLevel,
    message: impl Into<String>,
    args: impl Into<Option<LogArgs>>,
) -> LogEntry {
    default_manager().new_entry(level, message, args)
}

pub fn log_message(message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
    default_manager().log_message(message, args);
}

pub fn log_error(error: &dyn std::error::Error, args: impl Into<Option<LogArgs>>) {
    default_manager().log_error(error, args);
}

pub fn info(message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
    default_manager().info(message, args);
}

pub fn warning(message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
    default_manager().warning(message, args);
}

pub fn error(message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
    default_manager().error(message, args);
}

pub fn fatal(message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
    default_manager().fatal(message, args);
}

/// Close every handler of the default manager
///
/// The manager itself stays usable.
pub fn shutdown(timeout: Duration) -> bool {
    default_manager().shutdown(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogFormat;
    use crate::handlers::MemoryHandler;

    // The default manager is shared by every test in this binary, so everything
    // runs under one test with handler names no other test uses.
    #[test]
    fn test_default_manager_round_trip() {
        assert!(std::ptr::eq(default_manager(), default_manager()));
        assert!(enabled());
        assert!(!stacktrace_enabled());

        let handler = Arc::new(MemoryHandler::new("global-test-memory", LogFormat::Custom));
        register_handler(handler.clone()).unwrap();

        let args = LogArgs::new().with_field("attempt", 2);
        warning("retrying", args);
        assert!(handler.wait_for(1, Duration::from_secs(2)));
        let entry = &handler.entries()[0];
        assert_eq!(entry.level, LogLevel::WARNING);
        assert!(entry.stack.is_none());

        enable_stacktrace();
        let with_stack = new_entry(LogLevel::FATAL, "boom", None);
        assert!(with_stack.stack.is_some());
        disable_stacktrace();

        disable();
        info("dropped", None);
        enable();

        assert!(handler_stats("global-test-memory").is_some());
        assert!(unregister_handler("global-test-memory"));
        assert_eq!(handler.len(), 1);
    }
}
