//! Core dispatch types and traits

pub mod bucket;
pub mod config;
pub mod error;
pub mod failure_policy;
pub mod formatter;
pub mod handler;
pub mod log_args;
pub mod log_entry;
pub mod log_level;
pub mod log_queue;
pub mod manager;
pub mod metrics;

pub use bucket::{HandlerStats, LogBucket};
pub use config::{LogManagerConfig, DEFAULT_IDLE_POLL, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use failure_policy::{
    FailureCallback, FailurePolicy, HandlerFailure, DEFAULT_MAX_CONSECUTIVE_FAILURES,
};
pub use formatter::{format_json, format_text, LogFormat};
pub use handler::{Content, HandlerBase, LogHandler, Payload};
pub use log_args::{FieldValue, LogArgs};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use log_queue::{
    default_capacity, set_default_capacity, LogQueue, QueueItem, MAX_BUCKET_CAPACITY,
    MIN_BUCKET_CAPACITY, USE_DEFAULT_CAPACITY,
};
pub use manager::{LogManager, LogManagerBuilder};
pub use metrics::LoggerMetrics;
