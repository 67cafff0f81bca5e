//! Basic usage of the dispatch pipeline
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatch::prelude::*;
use rust_log_dispatch::{error, info, warning};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    let log_path = std::env::temp_dir().join("rust_log_dispatch_demo.log");

    let manager = LogManager::builder()
        .failure_policy(FailurePolicy::DisableAfter(3))
        .on_failure(Arc::new(|failure: &HandlerFailure| {
            eprintln!(
                "handler {} failed ({} in a row): {}",
                failure.handler, failure.consecutive_failures, failure.error
            );
        }))
        .handler(Arc::new(ConsoleHandler::new()))
        .handler(Arc::new(
            FileHandler::with_format("json-file", &log_path, LogFormat::Json)?,
        ))
        .build()?;

    info!(manager, "Application started");

    let args = LogArgs::new()
        .with_field("user", "alice")
        .with_field("attempt", 2);
    warning!(manager, args; "Login retry for {}", "alice");

    let mut entry = manager.new_entry(LogLevel::INFO, "Loading configuration", None);
    entry.start_watch();
    std::thread::sleep(Duration::from_millis(15));
    entry.stop_watch();
    manager.log(entry);

    manager.enable_stacktrace();
    error!(manager, "Connection lost: {}", "timeout");
    manager.disable_stacktrace();

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "cache file missing");
    manager.log_error(&err, LogArgs::new().with_field("path", "/var/cache/app"));

    // Give the workers a moment before reporting
    std::thread::sleep(Duration::from_millis(100));
    for name in manager.handler_names() {
        if let Some(stats) = manager.handler_stats(&name) {
            println!("{}", serde_json::to_string(&stats)?);
        }
    }
    println!("JSON records written to {}", log_path.display());

    manager.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    Ok(())
}
