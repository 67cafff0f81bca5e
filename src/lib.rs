//! # Rust Log Dispatch
//!
//! Fan-out log dispatch: every entry passed to a [`LogManager`] is handed to each
//! registered handler through that handler's own bounded queue and worker thread.
//!
//! ## Features
//!
//! - **Non-blocking call sites**: `log` pushes into per-handler queues and returns
//! - **Render once**: text and JSON forms are built at most once per `log` call
//! - **Bounded memory**: full queues evict their oldest entry
//! - **Isolation**: a failing or panicking handler never affects the others
//!
//! ## Example
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let manager = LogManager::new();
//! let memory = Arc::new(MemoryHandler::new("memory", LogFormat::Json));
//! manager.register_handler(memory.clone()).unwrap();
//!
//! manager.info("service started", LogArgs::new().with_field("port", 8080));
//! assert!(memory.wait_for(1, Duration::from_secs(2)));
//! assert!(memory.lines()[0].contains("\"port\":8080"));
//! ```

pub mod core;
pub mod global;
pub mod handlers;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::handlers::ConsoleHandler;
    #[cfg(feature = "file")]
    pub use crate::handlers::FileHandler;
    pub use crate::handlers::MemoryHandler;
    pub use crate::core::{
        FailureCallback, FailurePolicy, FieldValue, HandlerBase, HandlerFailure, HandlerStats,
        LogArgs, LogEntry, LogFormat, LogHandler, LogLevel, LogManager, LogManagerBuilder,
        LogManagerConfig, LoggerError, LoggerMetrics, Payload, Result, DEFAULT_SHUTDOWN_TIMEOUT,
        MAX_BUCKET_CAPACITY, MIN_BUCKET_CAPACITY,
    };
}

#[cfg(feature = "console")]
pub use crate::handlers::ConsoleHandler;
#[cfg(feature = "file")]
pub use crate::handlers::FileHandler;
pub use crate::handlers::MemoryHandler;
pub use crate::core::{
    default_capacity, set_default_capacity, Content, FailureCallback, FailurePolicy, FieldValue,
    HandlerBase, HandlerFailure, HandlerStats, LogArgs, LogEntry, LogFormat, LogHandler, LogLevel,
    LogManager, LogManagerBuilder, LogManagerConfig, LoggerError, LoggerMetrics, Payload, Result,
    DEFAULT_SHUTDOWN_TIMEOUT, MAX_BUCKET_CAPACITY, MIN_BUCKET_CAPACITY, USE_DEFAULT_CAPACITY,
};
