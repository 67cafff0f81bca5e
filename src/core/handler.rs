//! Handler trait for log output destinations

use super::error::Result;
use super::formatter::LogFormat;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::log_queue::USE_DEFAULT_CAPACITY;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An output destination fed by its own bucket worker
///
/// Handlers are shared between the manager and the worker thread, so every method
/// takes `&self`; the on/off switch needs interior mutability (see [`HandlerBase`]).
/// `process` receives exactly the representation named by `format()`.
///
/// # Example
///
/// ```
/// use rust_log_dispatch::core::{HandlerBase, LogFormat, LogHandler, Payload, Result};
///
/// struct StdoutHandler {
///     base: HandlerBase,
/// }
///
/// impl LogHandler for StdoutHandler {
///     fn name(&self) -> &str { self.base.name() }
///     fn enable(&self) { self.base.enable() }
///     fn disable(&self) { self.base.disable() }
///     fn enabled(&self) -> bool { self.base.enabled() }
///     fn format(&self) -> LogFormat { LogFormat::Text }
///
///     fn process(&self, payload: &Payload) -> Result<()> {
///         if let Some(line) = payload.as_str() {
///             println!("{}", line);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait LogHandler: Send + Sync {
    /// Registry key used by `register_handler`
    fn name(&self) -> &str;

    fn enable(&self);

    fn disable(&self);

    fn enabled(&self) -> bool;

    /// Levels this handler is interested in; filtering is up to the handler
    fn level(&self) -> LogLevel {
        LogLevel::ALL
    }

    fn format(&self) -> LogFormat;

    /// Requested queue capacity; `-1` follows the process-wide default
    fn queue_len(&self) -> i32 {
        USE_DEFAULT_CAPACITY
    }

    /// Must not block indefinitely; the bucket applies no timeout around it
    fn process(&self, payload: &Payload) -> Result<()>;
}

/// Representation carried by a [`Payload`]
#[derive(Debug, Clone)]
pub enum Content {
    Text(Arc<[u8]>),
    Json(Arc<[u8]>),
    Entry(Arc<LogEntry>),
}

/// One queued delivery: the entry level plus the representation for one format family
///
/// Byte forms are shared between every bucket of a single `log` call.
#[derive(Debug, Clone)]
pub struct Payload {
    level: LogLevel,
    content: Content,
}

impl Payload {
    pub fn text(level: LogLevel, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            level,
            content: Content::Text(bytes.into()),
        }
    }

    pub fn json(level: LogLevel, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            level,
            content: Content::Json(bytes.into()),
        }
    }

    pub fn entry(entry: Arc<LogEntry>) -> Self {
        Self {
            level: entry.level,
            content: Content::Entry(entry),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Format family this payload was produced for
    pub fn format(&self) -> LogFormat {
        match self.content {
            Content::Text(_) => LogFormat::Text,
            Content::Json(_) => LogFormat::Json,
            Content::Entry(_) => LogFormat::Custom,
        }
    }

    /// Serialized bytes for text and JSON payloads
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.content {
            Content::Text(bytes) | Content::Json(bytes) => Some(&bytes[..]),
            Content::Entry(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn as_entry(&self) -> Option<&LogEntry> {
        match &self.content {
            Content::Entry(entry) => Some(&**entry),
            _ => None,
        }
    }

    /// Byte payloads with no bytes carry nothing worth delivering
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_some_and(<[u8]>::is_empty)
    }
}

/// Shared state most handlers need: name, on/off switch, level filter, format and
/// queue length
#[derive(Debug)]
pub struct HandlerBase {
    name: String,
    enabled: AtomicBool,
    level: LogLevel,
    format: LogFormat,
    queue_len: i32,
}

impl HandlerBase {
    pub fn new(name: impl Into<String>, format: LogFormat) -> Self {
        Self {
            name: name.into(),
            enabled: AtomicBool::new(true),
            level: LogLevel::ALL,
            format,
            queue_len: USE_DEFAULT_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_queue_len(mut self, queue_len: i32) -> Self {
        self.queue_len = queue_len;
        self
    }

    /// In-place form of [`HandlerBase::with_level`] for handlers that own the base
    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    pub fn set_queue_len(&mut self, queue_len: i32) {
        self.queue_len = queue_len;
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn queue_len(&self) -> i32 {
        self.queue_len
    }

    /// Whether a payload passes this handler's level filter
    pub fn accepts(&self, payload: &Payload) -> bool {
        self.level.is_empty() || self.level.contains(payload.level())
    }
}
