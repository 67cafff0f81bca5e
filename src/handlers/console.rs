//! Console handler implementation

use crate::core::{
    format_text, HandlerBase, LogFormat, LogHandler, LogLevel, Payload, Result,
};
use colored::Colorize;
use std::io::Write;

/// Writes each payload as one line to stdout, or stderr for error and fatal entries
pub struct ConsoleHandler {
    base: HandlerBase,
    use_colors: bool,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self::with_format("console", LogFormat::Text)
    }

    /// Console handler with a custom registry name and output format
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatch::handlers::ConsoleHandler;
    /// use rust_log_dispatch::{LogFormat, LogHandler};
    ///
    /// let handler = ConsoleHandler::with_format("stdout-json", LogFormat::Json);
    /// assert_eq!(handler.name(), "stdout-json");
    /// ```
    pub fn with_format(name: impl Into<String>, format: LogFormat) -> Self {
        Self {
            base: HandlerBase::new(name, format),
            use_colors: true,
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Only write entries whose level is in `level`
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

    fn render(&self, payload: &Payload) -> Option<String> {
        let line = match payload.as_entry() {
            Some(entry) => format_text(entry),
            None => payload.as_str()?.to_string(),
        };

        if self.use_colors && payload.format() != LogFormat::Json {
            Some(line.color(payload.level().color_code()).to_string())
        } else {
            Some(line)
        }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHandler for ConsoleHandler {
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
        let Some(line) = self.render(payload) else {
            return Ok(());
        };

        // Route Error and Fatal levels to stderr, others to stdout
        let level = payload.level();
        if level.contains(LogLevel::ERROR) || level.contains(LogLevel::FATAL) {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{}", line)?;
        } else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", line)?;
            stdout.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogEntry;
    use std::sync::Arc;

    #[test]
    fn test_plain_render_keeps_payload() {
        let handler = ConsoleHandler::new().with_colors(false);
        let payload = Payload::text(LogLevel::INFO, b"message=\"hi\" ".to_vec());
        assert_eq!(handler.render(&payload).as_deref(), Some("message=\"hi\" "));
    }

    #[test]
    fn test_custom_payload_rendered_as_text() {
        let handler = ConsoleHandler::with_format("raw", LogFormat::Custom).with_colors(false);
        let entry = Arc::new(LogEntry::warning("disk low"));
        let line = handler.render(&Payload::entry(entry)).unwrap();
        assert!(line.contains("level=\"warning\""));
        assert!(line.contains("message=\"disk low\""));
    }

    #[test]
    fn test_level_filter_skips_write() {
        let handler = ConsoleHandler::new()
            .with_colors(false)
            .with_level(LogLevel::FATAL);
        let payload = Payload::text(LogLevel::INFO, b"ignored".to_vec());
        assert!(handler.process(&payload).is_ok());
    }
}
