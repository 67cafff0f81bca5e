//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The first argument is
//! anything exposing `log_with_args`, usually a [`LogManager`](crate::LogManager).
//!
//! # Examples
//!
//! ```
//! use rust_log_dispatch::prelude::*;
//! use rust_log_dispatch::info;
//!
//! let manager = LogManager::new();
//!
//! // Basic logging
//! info!(manager, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(manager, "Server listening on port {}", port);
//!
//! // With structured arguments
//! let args = LogArgs::new().with_field("user_id", 42);
//! info!(manager, args; "User {} logged in", "alice");
//! ```

/// Log a message at the given level with automatic formatting.
///
/// Structured arguments go before the message, separated by `;`.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let manager = LogManager::new();
/// use rust_log_dispatch::log;
/// log!(manager, LogLevel::INFO, "Simple message");
/// log!(manager, LogLevel::ERROR, "Error code: {}", 500);
/// log!(manager, LogLevel::WARNING, LogArgs::new().with_field("disk", "sda1"); "Low space");
/// ```
#[macro_export]
macro_rules! log {
    ($manager:expr, $level:expr, $args:expr; $($arg:tt)+) => {
        $manager.log_with_args($level, format!($($arg)+), $args)
    };
    ($manager:expr, $level:expr, $($arg:tt)+) => {
        $manager.log_with_args($level, format!($($arg)+), None::<$crate::LogArgs>)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let manager = LogManager::new();
/// use rust_log_dispatch::info;
/// info!(manager, "Application started");
/// info!(manager, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($manager:expr, $args:expr; $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::INFO, $args; $($arg)+)
    };
    ($manager:expr, $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let manager = LogManager::new();
/// use rust_log_dispatch::warning;
/// warning!(manager, "Low disk space");
/// warning!(manager, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($manager:expr, $args:expr; $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::WARNING, $args; $($arg)+)
    };
    ($manager:expr, $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::WARNING, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let manager = LogManager::new();
/// use rust_log_dispatch::error;
/// error!(manager, "Failed to connect to database");
/// error!(manager, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($manager:expr, $args:expr; $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::ERROR, $args; $($arg)+)
    };
    ($manager:expr, $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only logs; the process keeps running.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatch::prelude::*;
/// # let manager = LogManager::new();
/// use rust_log_dispatch::fatal;
/// fatal!(manager, "Critical system failure");
/// fatal!(manager, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($manager:expr, $args:expr; $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::FATAL, $args; $($arg)+)
    };
    ($manager:expr, $($arg:tt)+) => {
        $crate::log!($manager, $crate::LogLevel::FATAL, $($arg)+)
    };
}
