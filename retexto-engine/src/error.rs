//! Layered error types
//!
//! [`ProcessingError`] describes one failed call to a fragment processor;
//! [`EngineError`] is what a whole run returns.

use retexto_core::CoreError;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single fragment processor call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    /// The processor reported an error
    #[error("processor failed: {message}")]
    Failed {
        /// Description from the processor
        message: String,
        /// Whether another attempt may succeed
        retryable: bool,
    },

    /// The processor returned empty or whitespace-only text
    #[error("processor returned empty output")]
    EmptyOutput,

    /// The call did not finish within the configured timeout
    #[error("processor call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl ProcessingError {
    /// A failure worth retrying (rate limits, dropped connections)
    pub fn failed(message: impl Into<String>) -> Self {
        ProcessingError::Failed {
            message: message.into(),
            retryable: true,
        }
    }

    /// A failure no retry can fix (rejected content, bad request)
    pub fn permanent(message: impl Into<String>) -> Self {
        ProcessingError::Failed {
            message: message.into(),
            retryable: false,
        }
    }

    /// Whether the retry policy applies to this error
    pub fn is_transient(&self) -> bool {
        match self {
            ProcessingError::Failed { retryable, .. } => *retryable,
            ProcessingError::EmptyOutput | ProcessingError::Timeout(_) => true,
        }
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core algorithm or configuration error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A fragment failed and the failure policy is to abort the run
    #[error("fragment {index} failed: {source}")]
    Aborted {
        /// Sequence index of the failed fragment
        index: usize,
        /// Last error returned for that fragment
        #[source]
        source: ProcessingError,
    },

    /// Invalid engine configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Encoding error (UTF-8, etc.)
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A spawned fragment task panicked or was cancelled
    #[error("fragment task failed: {0}")]
    Join(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for EngineError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EngineError::Encoding(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        EngineError::Join(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
