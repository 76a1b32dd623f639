//! Error types for the result backend

use thiserror::Error;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors surfaced by the store client and the result backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Redis/Valkey connection or command errors
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Task metadata serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A single store call exceeded the configured timeout
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// Connection could not be established or was lost
    #[error("Connection error: {message}")]
    Connection { message: String },
}

impl BackendError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Create a connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Check if the error is transient (worth another attempt on a fresh connection)
    pub fn is_recoverable(&self) -> bool {
        match self {
            BackendError::Redis(_) => true,
            BackendError::Timeout { .. } => true,
            BackendError::Connection { .. } => true,
            BackendError::Serialization(_) => false,
            BackendError::Config { .. } => false,
        }
    }
}
