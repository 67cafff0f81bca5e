//! Failure policies for handlers whose `process` call errors or panics
//!
//! A bucket worker never dies because of its handler. Every failure is counted
//! and reported; the policy decides when a repeatedly failing handler is switched
//! off (disabled, not unregistered).

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default number of consecutive failures before a handler is disabled
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Policy for handlers that keep failing
///
/// # Example
///
/// ```
/// use rust_log_dispatch::FailurePolicy;
///
/// // Default behavior: disable after 5 failures in a row
/// let policy = FailurePolicy::default();
/// assert_eq!(policy, FailurePolicy::DisableAfter(5));
///
/// // Keep calling the handler no matter what
/// let policy = FailurePolicy::Ignore;
/// assert!(!policy.should_disable(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report failures but never disable the handler
    Ignore,

    /// Disable the handler once this many `process` calls in a row have failed
    ///
    /// `DisableAfter(0)` behaves like `Ignore`.
    DisableAfter(u32),
}

impl FailurePolicy {
    pub fn should_disable(&self, consecutive_failures: u32) -> bool {
        match self {
            FailurePolicy::Ignore => false,
            FailurePolicy::DisableAfter(0) => false,
            FailurePolicy::DisableAfter(limit) => consecutive_failures >= *limit,
        }
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::DisableAfter(DEFAULT_MAX_CONSECUTIVE_FAILURES)
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Ignore => write!(f, "Ignore"),
            FailurePolicy::DisableAfter(n) => write!(f, "DisableAfter({})", n),
        }
    }
}

/// Diagnostic event raised each time a handler's `process` call fails
#[derive(Debug)]
pub struct HandlerFailure {
    /// Registry name of the bucket whose handler failed
    pub handler: String,
    pub error: LoggerError,
    /// Failures in a row, including this one
    pub consecutive_failures: u32,
    /// True when this failure caused the handler to be disabled
    pub disabled: bool,
}

/// Callback type for handler failure notifications
///
/// Invoked on the failing bucket's worker thread.
pub type FailureCallback = Arc<dyn Fn(&HandlerFailure) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_default() {
        assert_eq!(
            FailurePolicy::default(),
            FailurePolicy::DisableAfter(DEFAULT_MAX_CONSECUTIVE_FAILURES)
        );
    }

    #[test]
    fn test_failure_policy_display() {
        assert_eq!(FailurePolicy::Ignore.to_string(), "Ignore");
        assert_eq!(FailurePolicy::DisableAfter(3).to_string(), "DisableAfter(3)");
    }

    #[test]
    fn test_should_disable() {
        let policy = FailurePolicy::DisableAfter(3);
        assert!(!policy.should_disable(2));
        assert!(policy.should_disable(3));
        assert!(policy.should_disable(4));

        assert!(!FailurePolicy::DisableAfter(0).should_disable(100));
        assert!(!FailurePolicy::Ignore.should_disable(u32::MAX));
    }

    #[test]
    fn test_failure_policy_serde() {
        let json = serde_json::to_string(&FailurePolicy::DisableAfter(2)).unwrap();
        assert_eq!(json, r#"{"disable_after":2}"#);
        let back: FailurePolicy = serde_json::from_str(r#""ignore""#).unwrap();
        assert_eq!(back, FailurePolicy::Ignore);
    }
}
