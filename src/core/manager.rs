//! Handler registry and fan-out

use super::{
    bucket::{HandlerStats, LogBucket, WorkerContext},
    config::LogManagerConfig,
    error::{LoggerError, Result},
    failure_policy::{FailureCallback, FailurePolicy},
    formatter::RenderCache,
    handler::LogHandler,
    log_args::LogArgs,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Registry of handlers plus the logging and stack trace switches
///
/// Each registered handler gets its own [`LogBucket`]: a bounded queue and a worker
/// thread. [`LogManager::log`] only holds the registry lock long enough to render
/// the entry (once per format family) and push it into every enabled bucket.
pub struct LogManager {
    enabled: AtomicBool,
    stacktrace: AtomicBool,
    buckets: Mutex<HashMap<String, Arc<LogBucket>>>,
    context: WorkerContext,
    shutdown_timeout: Duration,
}

impl LogManager {
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(LogManagerConfig::default(), None)
    }

    /// Create a manager from a validated configuration
    pub fn with_config(config: LogManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, None))
    }

    fn from_parts(config: LogManagerConfig, on_failure: Option<FailureCallback>) -> Self {
        Self {
            enabled: AtomicBool::new(config.enabled),
            stacktrace: AtomicBool::new(config.stacktrace),
            buckets: Mutex::new(HashMap::new()),
            context: WorkerContext {
                idle_poll: config.idle_poll(),
                failure_policy: config.failure_policy,
                on_failure,
                metrics: Arc::new(LoggerMetrics::new()),
            },
            shutdown_timeout: config.shutdown_timeout(),
        }
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn enable_stacktrace(&self) {
        self.stacktrace.store(true, Ordering::Release);
    }

    pub fn disable_stacktrace(&self) {
        self.stacktrace.store(false, Ordering::Release);
    }

    pub fn stacktrace_enabled(&self) -> bool {
        self.stacktrace.load(Ordering::Acquire)
    }

    /// Register a handler under its own name, replacing any handler with that name
    pub fn register_handler(&self, handler: Arc<dyn LogHandler>) -> Result<()> {
        let name = handler.name().to_string();
        self.register_handler_with_name(&name, handler)
    }

    /// Register a handler under `name` (its own name if `name` is empty)
    ///
    /// A bucket already registered under that name is closed and its worker
    /// joined (bounded by the shutdown timeout) before this returns.
    pub fn register_handler_with_name(
        &self,
        name: &str,
        handler: Arc<dyn LogHandler>,
    ) -> Result<()> {
        let name = if name.is_empty() {
            handler.name().to_string()
        } else {
            name.to_string()
        };
        if name.is_empty() {
            return Err(LoggerError::config("LogManager", "handler name must not be empty"));
        }

        let bucket = Arc::new(LogBucket::new(name.clone(), handler, self.context.clone()));

        let replaced = {
            let mut buckets = self.buckets.lock();
            let replaced = buckets.insert(name.clone(), Arc::clone(&bucket));
            if let Some(ref old) = replaced {
                old.close();
            }
            if let Err(e) = bucket.start() {
                buckets.remove(&name);
                bucket.close();
                return Err(e);
            }
            replaced
        };

        if let Some(old) = replaced {
            old.join(self.shutdown_timeout);
        }
        Ok(())
    }

    /// Close and remove the handler registered under `name`
    ///
    /// Returns false (and does nothing) if no such handler is registered.
    pub fn unregister_handler(&self, name: &str) -> bool {
        let removed = {
            let mut buckets = self.buckets.lock();
            let removed = buckets.remove(name);
            if let Some(ref bucket) = removed {
                bucket.close();
            }
            removed
        };

        match removed {
            Some(bucket) => {
                bucket.join(self.shutdown_timeout);
                true
            }
            None => false,
        }
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.buckets.lock().contains_key(name)
    }

    pub fn handler_count(&self) -> usize {
        self.buckets.lock().len()
    }

    /// Registered handler names, sorted
    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn handler_stats(&self, name: &str) -> Option<HandlerStats> {
        self.buckets.lock().get(name).map(|bucket| bucket.stats())
    }

    /// Fan an entry out to every enabled handler
    ///
    /// Text and JSON forms are rendered at most once per call and shared; custom
    /// handlers receive the entry itself. Does nothing while logging is disabled.
    pub fn log(&self, entry: impl Into<Arc<LogEntry>>) {
        if !self.enabled() {
            return;
        }

        let metrics = &self.context.metrics;
        metrics.record_logged();
        let mut cache = RenderCache::new(entry.into(), metrics);

        let buckets = self.buckets.lock();
        for bucket in buckets.values().filter(|bucket| bucket.enabled()) {
            if let Some(payload) = cache.payload(bucket.format()) {
                bucket.push(payload);
            }
        }
    }

    /// Build an entry, capturing a stack trace when both switches are on
    pub fn new_entry(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        args: impl Into<Option<LogArgs>>,
    ) -> LogEntry {
        let entry = LogEntry::new(level, message).with_args(args);
        if self.enabled() && self.stacktrace_enabled() {
            entry.with_stack()
        } else {
            entry
        }
    }

    /// Log an informational message with optional arguments
    pub fn log_message(&self, message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
        self.log_with_args(LogLevel::INFO, message, args);
    }

    /// Log an error value at error level
    pub fn log_error(&self, error: &dyn std::error::Error, args: impl Into<Option<LogArgs>>) {
        self.log_with_args(LogLevel::ERROR, error.to_string(), args);
    }

    pub fn log_with_args(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        args: impl Into<Option<LogArgs>>,
    ) {
        if !self.enabled() {
            return;
        }
        self.log(self.new_entry(level, message, args));
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
        self.log_with_args(LogLevel::INFO, message, args);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
        self.log_with_args(LogLevel::WARNING, message, args);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
        self.log_with_args(LogLevel::ERROR, message, args);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>, args: impl Into<Option<LogArgs>>) {
        self.log_with_args(LogLevel::FATAL, message, args);
    }

    /// Get the manager metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatch::LogManager;
    ///
    /// let manager = LogManager::new();
    ///
    /// // After logging operations...
    /// let metrics = manager.metrics();
    /// println!("Delivered: {}", metrics.delivered_count());
    /// println!("Evicted: {}", metrics.evicted_count());
    /// println!("Eviction rate: {:.2}%", metrics.eviction_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.context.metrics
    }

    /// Close every bucket and wait for their workers
    ///
    /// Pending entries are discarded. Returns true if every worker exited within
    /// `timeout`. The manager stays usable; handlers may be registered again.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let drained: Vec<Arc<LogBucket>> = {
            let mut buckets = self.buckets.lock();
            let drained: Vec<_> = buckets.drain().map(|(_, bucket)| bucket).collect();
            for bucket in &drained {
                bucket.close();
            }
            drained
        };

        let start = Instant::now();
        let mut clean = true;
        for bucket in drained {
            let remaining = timeout.saturating_sub(start.elapsed());
            clean &= bucket.join(remaining);
        }
        clean
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        if !self.shutdown(self.shutdown_timeout) {
            eprintln!(
                "[LOGGER WARNING] Some handler workers did not finish within {:?} timeout.",
                self.shutdown_timeout
            );
        }

        let metrics = &self.context.metrics;
        let evicted = metrics.evicted_count();
        if evicted > 0 {
            eprintln!(
                "[LOGGER WARNING] Log manager shutting down with {} evicted entries (eviction rate: {:.2}%)",
                evicted,
                metrics.eviction_rate()
            );
        }
    }
}

/// Builder for constructing a LogManager with a fluent API
///
/// # Example
/// ```
/// use rust_log_dispatch::prelude::*;
/// use std::sync::Arc;
///
/// let manager = LogManager::builder()
///     .stacktrace(false)
///     .failure_policy(FailurePolicy::DisableAfter(3))
///     .handler(Arc::new(MemoryHandler::new("memory", LogFormat::Json)))
///     .on_failure(Arc::new(|failure: &HandlerFailure| {
///         eprintln!("ALERT: handler {} failed: {}", failure.handler, failure.error);
///     }))
///     .build()
///     .expect("valid configuration");
///
/// assert!(manager.has_handler("memory"));
/// ```
pub struct LogManagerBuilder {
    config: LogManagerConfig,
    on_failure: Option<FailureCallback>,
    handlers: Vec<(String, Arc<dyn LogHandler>)>,
}

impl LogManagerBuilder {
    pub fn new() -> Self {
        Self {
            config: LogManagerConfig::default(),
            on_failure: None,
            handlers: Vec::new(),
        }
    }

    /// Start from an existing configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LogManagerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stacktrace(mut self, enabled: bool) -> Self {
        self.config.stacktrace = enabled;
        self
    }

    /// Upper bound on how long an idle worker sleeps between queue checks
    #[must_use = "builder methods return a new value"]
    pub fn idle_poll(mut self, interval: Duration) -> Self {
        self.config.idle_poll_ms = interval.as_millis() as u64;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout_ms = timeout.as_millis() as u64;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Set a callback for handler failure notifications
    ///
    /// The callback runs on the failing handler's worker thread.
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    /// Register a handler under its own name once the manager is built
    #[must_use = "builder methods return a new value"]
    pub fn handler(mut self, handler: Arc<dyn LogHandler>) -> Self {
        self.handlers.push((String::new(), handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn named_handler(mut self, name: impl Into<String>, handler: Arc<dyn LogHandler>) -> Self {
        self.handlers.push((name.into(), handler));
        self
    }

    /// Build the LogManager and register the collected handlers
    pub fn build(self) -> Result<LogManager> {
        self.config.validate()?;
        let manager = LogManager::from_parts(self.config, self.on_failure);
        for (name, handler) in self.handlers {
            manager.register_handler_with_name(&name, handler)?;
        }
        Ok(manager)
    }
}

impl Default for LogManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LogManager {
    /// Create a builder for LogManager
    #[must_use]
    pub fn builder() -> LogManagerBuilder {
        LogManagerBuilder::new()
    }
}
