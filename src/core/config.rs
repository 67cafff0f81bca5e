//! Manager configuration
//!
//! `LogManagerConfig` can be built in code (usually through
//! [`LogManagerBuilder`](super::manager::LogManagerBuilder)) or deserialized from JSON.

use super::error::{LoggerError, Result};
use super::failure_policy::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wait before an idle bucket worker re-checks its queue
pub const DEFAULT_IDLE_POLL: Duration = Duration::from_millis(10);

/// Default shutdown timeout for joining bucket workers (5 seconds)
///
/// Used when the manager is dropped and when a replaced or unregistered bucket is
/// joined. For custom timeout control use `LogManager::shutdown`.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogManagerConfig {
    /// Initial state of the logging switch
    pub enabled: bool,

    /// Initial state of the stack trace switch
    pub stacktrace: bool,

    /// Upper bound on how long an idle worker sleeps between queue checks
    pub idle_poll_ms: u64,

    /// How long to wait for a closed bucket's worker to exit
    pub shutdown_timeout_ms: u64,

    pub failure_policy: FailurePolicy,
}

impl Default for LogManagerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stacktrace: false,
            idle_poll_ms: DEFAULT_IDLE_POLL.as_millis() as u64,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl LogManagerConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.idle_poll_ms == 0 {
            return Err(LoggerError::config(
                "LogManagerConfig",
                "idle_poll_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Idle poll interval, never shorter than one millisecond
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms.max(1))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
