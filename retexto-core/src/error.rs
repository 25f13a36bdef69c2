//! Core error types (deterministic only)

use thiserror::Error;

/// Core errors (no I/O, no external failures)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid tier/overlap configuration. Fatal, never retried.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Offset outside the text or not on a UTF-8 character boundary
    #[error("invalid offset {offset} for text of {len} bytes")]
    InvalidOffset {
        /// The rejected byte offset
        offset: usize,
        /// Length of the text in bytes
        len: usize,
    },

    /// The fragmenter produced a cut that does not move past the current start
    #[error("fragmenter stalled at offset {offset}")]
    Stalled {
        /// Start offset that failed to advance
        offset: usize,
    },

    /// Processed fragments and overlaps disagree in length
    #[error("expected {expected} overlap entries, got {actual}")]
    LengthMismatch {
        /// Number of processed fragments
        expected: usize,
        /// Number of overlap entries supplied
        actual: usize,
    },

    /// Unsupported language requested
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A rewrite rule could not be compiled
    #[error("invalid rule '{name}': {reason}")]
    InvalidRule {
        /// Rule name from the language configuration
        name: String,
        /// Compilation failure
        reason: String,
    },
}

impl CoreError {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        CoreError::Configuration(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
