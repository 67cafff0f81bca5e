//! Output formats for log entries
//!
//! Every handler declares one format family:
//! - Text: `key="value" ` pairs, one line, no trailing newline
//! - Json: one JSON object with a fixed field set
//! - Custom: the structured [`LogEntry`] itself, unserialized
//!
//! Serialization happens at most once per family per `log` call; see [`RenderCache`].

use super::error::{LoggerError, Result};
use super::handler::Payload;
use super::log_args::{FieldValue, LogArgs};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::sync::Arc;

/// Representation a handler wants to receive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Example: `id="5F0C..." time="2025-01-08T10:30:45.123456Z" duration="0ns" level="info" message="ready" stack="" `
    #[default]
    Text,

    /// Example: `{"id":"5F0C...","time":"2025-01-08T10:30:45.123456Z","duration":0,"level":"info","message":"ready","stack":""}`
    Json,

    /// The structured entry is passed through unmodified
    Custom,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Custom => write!(f, "custom"),
        }
    }
}

impl LogFormat {
    /// Serialize an entry for this format; `Custom` has no byte form
    pub fn render(&self, entry: &LogEntry) -> Result<Option<Vec<u8>>> {
        match self {
            LogFormat::Text => Ok(Some(format_text(entry).into_bytes())),
            LogFormat::Json => Ok(Some(format_json(entry)?.into_bytes())),
            LogFormat::Custom => Ok(None),
        }
    }
}

/// Strings made only of these characters are emitted as-is inside the quotes
fn is_plain(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | ','))
}

fn quote_into(out: &mut String, value: &str) {
    if is_plain(value) {
        out.push('"');
        out.push_str(value);
        out.push('"');
    } else {
        let _ = write!(out, "{:?}", value);
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');
    quote_into(out, value);
    out.push(' ');
}

fn format_time(entry: &LogEntry) -> String {
    entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Format as `key="value" ` pairs
pub fn format_text(entry: &LogEntry) -> String {
    let mut out = String::with_capacity(128 + entry.message.len());

    push_pair(&mut out, "id", &entry.id);
    push_pair(&mut out, "time", &format_time(entry));
    push_pair(
        &mut out,
        "duration",
        &format!("{:?}", entry.duration.unwrap_or_default()),
    );
    push_pair(&mut out, "level", &entry.level.to_string());
    push_pair(&mut out, "message", &entry.message);
    push_pair(&mut out, "stack", entry.stack.as_deref().unwrap_or_default());

    if let Some(ref args) = entry.args {
        for (key, value) in args.iter() {
            match value {
                FieldValue::String(s) => push_pair(&mut out, key, s),
                other => push_pair(&mut out, key, &other.to_string()),
            }
        }
    }

    out
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    id: &'a str,
    time: String,
    duration: u64,
    level: LogLevel,
    message: &'a str,
    stack: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<&'a LogArgs>,
}

/// Format as a single JSON object
pub fn format_json(entry: &LogEntry) -> Result<String> {
    let view = JsonEntry {
        id: &entry.id,
        time: format_time(entry),
        duration: entry
            .duration
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or_default(),
        level: entry.level,
        message: &entry.message,
        stack: entry.stack.as_deref().unwrap_or_default(),
        args: entry.args.as_ref().filter(|args| !args.is_empty()),
    };
    serde_json::to_string(&view).map_err(|e| LoggerError::formatter("json", e.to_string()))
}

/// Per-call memoization of the serialized forms of one entry
///
/// Created for a single fan-out and dropped afterwards. Text and JSON are rendered
/// lazily on first request and shared by every handler asking for the same family.
pub(crate) struct RenderCache<'a> {
    entry: Arc<LogEntry>,
    metrics: &'a LoggerMetrics,
    text: Option<Arc<[u8]>>,
    json: Option<Arc<[u8]>>,
}

impl<'a> RenderCache<'a> {
    pub(crate) fn new(entry: Arc<LogEntry>, metrics: &'a LoggerMetrics) -> Self {
        Self {
            entry,
            metrics,
            text: None,
            json: None,
        }
    }

    /// Payload for a handler declaring `format`, or `None` if serialization failed
    pub(crate) fn payload(&mut self, format: LogFormat) -> Option<Payload> {
        let level = self.entry.level;
        match format {
            LogFormat::Text => {
                if self.text.is_none() {
                    self.metrics.record_text_render();
                    self.text = Some(format_text(&self.entry).into_bytes().into());
                }
                self.text.clone().map(|bytes| Payload::text(level, bytes))
            }
            LogFormat::Json => {
                if self.json.is_none() {
                    self.metrics.record_json_render();
                    match format_json(&self.entry) {
                        Ok(json) => self.json = Some(json.into_bytes().into()),
                        Err(e) => {
                            eprintln!(
                                "[LOGGER ERROR] Failed to serialize entry {}: {}",
                                self.entry.id, e
                            );
                            return None;
                        }
                    }
                }
                self.json.clone().map(|bytes| Payload::json(level, bytes))
            }
            LogFormat::Custom => Some(Payload::entry(Arc::clone(&self.entry))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_entry() -> LogEntry {
        LogEntry::error("Error occurred")
    }

    #[test]
    fn test_text_format_field_order() {
        let entry = sample_entry();
        let result = format_text(&entry);

        let id_pos = result.find("id=").unwrap();
        let time_pos = result.find("time=").unwrap();
        let level_pos = result.find("level=").unwrap();
        let message_pos = result.find("message=").unwrap();
        let stack_pos = result.find("stack=").unwrap();
        assert!(id_pos < time_pos && time_pos < level_pos);
        assert!(level_pos < message_pos && message_pos < stack_pos);

        assert!(result.contains("level=\"error\" "));
        assert!(result.contains("duration=\"0ns\" "));
        assert!(result.ends_with("stack=\"\" "));
        assert!(!result.ends_with('\n'));
    }

    #[test]
    fn test_text_format_quoting() {
        let args = LogArgs::new()
            .with_field("plain", "v1.2,+x-y")
            .with_field("spaced", "hello \"world\"")
            .with_field("count", 5);
        let entry = LogEntry::info("Request processed").with_args(args);
        let result = format_text(&entry);

        assert!(result.contains("plain=\"v1.2,+x-y\" "));
        assert!(result.contains(r#"spaced="hello \"world\"" "#));
        assert!(result.contains("count=\"5\" "));
        assert!(result.contains("message=\"Request processed\" "));
    }

    #[test]
    fn test_text_format_escapes_newlines() {
        let entry = LogEntry::info("line one\nline two");
        let result = format_text(&entry);
        assert!(!result.contains('\n'));
        assert!(result.contains("line one\\nline two"));
    }

    #[test]
    fn test_text_format_duration() {
        let mut entry = LogEntry::info("timed");
        entry.duration = Some(Duration::from_millis(15));
        assert!(format_text(&entry).contains("duration=\"15ms\" "));
    }

    #[test]
    fn test_json_format() {
        let entry = sample_entry();
        let result = format_json(&entry).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["message"], "Error occurred");
        assert_eq!(parsed["id"], entry.id.as_str());
        assert_eq!(parsed["duration"], 0);
        assert_eq!(parsed["stack"], "");
        assert!(parsed["time"].is_string());
        assert!(parsed.get("args").is_none());
    }

    #[test]
    fn test_json_format_with_args() {
        let args = LogArgs::new()
            .with_field("request_id", "abc-123")
            .with_field("latency_ms", 42)
            .with_field("tags", vec!["a", "b"]);
        let entry = LogEntry::info("Request completed").with_args(args);

        let parsed: serde_json::Value =
            serde_json::from_str(&format_json(&entry).unwrap()).unwrap();
        assert_eq!(parsed["args"]["request_id"], "abc-123");
        assert_eq!(parsed["args"]["latency_ms"], 42);
        assert_eq!(parsed["args"]["tags"][1], "b");
    }

    #[test]
    fn test_json_zero_level_renders_all() {
        let mut entry = LogEntry::info("x");
        entry.level = LogLevel::default();
        let parsed: serde_json::Value =
            serde_json::from_str(&format_json(&entry).unwrap()).unwrap();
        assert_eq!(parsed["level"], "info|warning|error|fatal");
    }

    #[test]
    fn test_render_custom_has_no_bytes() {
        let entry = sample_entry();
        assert!(LogFormat::Custom.render(&entry).unwrap().is_none());
        assert!(LogFormat::Text.render(&entry).unwrap().is_some());
    }

    #[test]
    fn test_render_cache_renders_once_per_family() {
        let metrics = LoggerMetrics::new();
        let mut cache = RenderCache::new(Arc::new(sample_entry()), &metrics);

        for _ in 0..3 {
            assert!(cache.payload(LogFormat::Text).is_some());
            assert!(cache.payload(LogFormat::Json).is_some());
            assert!(cache.payload(LogFormat::Custom).is_some());
        }

        assert_eq!(metrics.text_renders(), 1);
        assert_eq!(metrics.json_renders(), 1);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Text);
        assert_eq!(LogFormat::Json.to_string(), "json");
    }
}
