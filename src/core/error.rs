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

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error, raised by declarative configuration
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Remote delivery failed
    #[error("Remote sink '{endpoint}' failed: {message}")]
    RemoteError { endpoint: String, message: String },

    /// Remote sink used after `close()`
    #[error("Remote sink '{endpoint}' is closed")]
    RemoteClosed { endpoint: String },

    /// Async delivery queue is full
    #[error("Remote queue full: {current}/{max} records buffered")]
    QueueFull { current: usize, max: usize },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Unknown severity name
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
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

    /// Create a remote delivery error
    pub fn remote(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::RemoteError {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a closed remote sink error
    pub fn remote_closed(endpoint: impl Into<String>) -> Self {
        LoggerError::RemoteClosed {
            endpoint: endpoint.into(),
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        LoggerError::QueueFull { current, max }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
