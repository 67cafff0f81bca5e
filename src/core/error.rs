//! Error types for the dispatch pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A handler returned an error from `process`
    #[error("Handler '{handler}' failed: {message}")]
    HandlerFailed { handler: String, message: String },

    /// A handler panicked inside `process`
    #[error("Handler '{handler}' panicked: {message}")]
    HandlerPanicked { handler: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a handler failure error
    pub fn handler_failed(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::HandlerFailed {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a handler panic error
    pub fn handler_panicked(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::HandlerPanicked {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error originated from a panic rather than a returned error
    pub fn is_panic(&self) -> bool {
        matches!(self, LoggerError::HandlerPanicked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::handler_failed("console", "stdout closed");
        assert!(matches!(err, LoggerError::HandlerFailed { .. }));
        assert!(!err.is_panic());

        let err = LoggerError::handler_panicked("file", "index out of bounds");
        assert!(err.is_panic());

        let err = LoggerError::config("LogManager", "idle poll must be positive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::handler_failed("console", "stdout closed");
        assert_eq!(err.to_string(), "Handler 'console' failed: stdout closed");

        let err = LoggerError::handler_panicked("file", "boom");
        assert_eq!(err.to_string(), "Handler 'file' panicked: boom");

        let err = LoggerError::formatter("JSON", "Invalid field type");
        assert_eq!(
            err.to_string(),
            "Formatter error (JSON): Invalid field type"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
