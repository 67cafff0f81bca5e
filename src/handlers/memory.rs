//! In-memory handler, mostly for tests and diagnostics

use crate::core::{HandlerBase, LogEntry, LogFormat, LogHandler, LogLevel, Payload, Result};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Keeps every payload it receives, in delivery order
pub struct MemoryHandler {
    base: HandlerBase,
    records: Mutex<Vec<Payload>>,
    arrived: Condvar,
}

impl MemoryHandler {
    pub fn new(name: impl Into<String>, format: LogFormat) -> Self {
        Self {
            base: HandlerBase::new(name, format),
            records: Mutex::new(Vec::new()),
            arrived: Condvar::new(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.base.set_level(level);
        self
    }

    #[must_use]
    pub fn with_queue_len(mut self, queue_len: i32) -> Self {
        self.base.set_queue_len(queue_len);
        self
    }

    pub fn records(&self) -> Vec<Payload> {
        self.records.lock().clone()
    }

    /// Text or JSON payloads as strings
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter_map(|payload| payload.as_str().map(str::to_string))
            .collect()
    }

    /// Entries received as custom payloads
    pub fn entries(&self) -> Vec<LogEntry> {
        self.records
            .lock()
            .iter()
            .filter_map(|payload| payload.as_entry().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Block until at least `count` payloads arrived or `timeout` passed
    ///
    /// Returns true if the count was reached.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut records = self.records.lock();
        while records.len() < count {
            if self.arrived.wait_until(&mut records, deadline).timed_out() {
                return records.len() >= count;
            }
        }
        true
    }
}

impl LogHandler for MemoryHandler {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn enable(&self) {
        self.base.enable()
    }

    fn disable(&self) {
        self.base.disable()
    }

    fn enabled(&self) -> bool {
        self.base.enabled()
    }

    fn level(&self) -> LogLevel {
        self.base.level()
    }

    fn format(&self) -> LogFormat {
        self.base.format()
    }

    fn queue_len(&self) -> i32 {
        self.base.queue_len()
    }

    fn process(&self, payload: &Payload) -> Result<()> {
        if !self.base.accepts(payload) {
            return Ok(());
        }
        self.records.lock().push(payload.clone());
        self.arrived.notify_all();
        Ok(())
    }
}
