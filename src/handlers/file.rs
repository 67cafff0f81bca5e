//! File handler implementation

use crate::core::{
    format_text, HandlerBase, LogFormat, LogHandler, LogLevel, LoggerError, Payload, Result,
};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per payload to a file
///
/// Text and JSON payloads are written as rendered; custom payloads fall back to the
/// text layout. Lines are buffered; set `flush_each` for durability over speed.
pub struct FileHandler {
    base: HandlerBase,
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    flush_each: bool,
}

impl FileHandler {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_format("file", path, LogFormat::Text)
    }

    pub fn with_format(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        format: LogFormat,
    ) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            base: HandlerBase::new(name, format),
            path,
            writer: Mutex::new(BufWriter::new(file)),
            flush_each: false,
        })
    }

    #[must_use]
    pub fn with_flush_each(mut self, flush_each: bool) -> Self {
        self.flush_each = flush_each;
        self
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

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl LogHandler for FileHandler {
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

        let mut writer = self.writer.lock();
        match payload.as_bytes() {
            Some(bytes) => writer.write_all(bytes)?,
            None => {
                if let Some(entry) = payload.as_entry() {
                    writer.write_all(format_text(entry).as_bytes())?;
                }
            }
        }
        writer.write_all(b"\n")?;

        if self.flush_each {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}
