//! Error types for the logger system

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

    /// The property source cannot tell which property file to read.
    ///
    /// This is the only fatal configuration error: without it the logger
    /// does not know where to write.
    #[error("Property source unavailable ({variable}): {message}")]
    PropertySource { variable: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Console write error
    #[error("Console write failed: {0}")]
    ConsoleError(String),
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

    /// Create a fatal property source error
    pub fn property_source(variable: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::PropertySource {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn console<S: Into<String>>(msg: S) -> Self {
        LoggerError::ConsoleError(msg.into())
    }

    /// Whether the logger cannot be started at all after this error
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoggerError::PropertySource { .. })
    }
}
