//! Engine error types

use thiserror::Error;
use trieseg_core::CoreError;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core algorithm error
    #[error("core algorithm error: {0}")]
    Core(#[from] CoreError),

    /// Invalid or missing configuration value
    #[error("invalid configuration for '{key}': {reason}")]
    Config {
        /// Property the problem belongs to
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoding error (UTF-8, etc.)
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The run was cancelled; all outputs have been closed
    #[error("interrupted")]
    Interrupted,
}

impl EngineError {
    /// Configuration error for `key`
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from cooperative cancellation
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            EngineError::Interrupted | EngineError::Core(CoreError::Interrupted)
        )
    }
}

impl From<std::string::FromUtf8Error> for EngineError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EngineError::Encoding(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
