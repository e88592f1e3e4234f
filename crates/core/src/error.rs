//! Error types for the bytebpe trainer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the trainer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Error during training
    #[error("Training error: {0}")]
    Training(String),

    /// Error saving vocabulary or merges
    #[error("Save error: {0}")]
    Save(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Regex compilation or matching error in the pre-tokenizer
    #[error("Regex error: {0}")]
    Regex(String),
}

/// Result type alias for trainer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
