//! Error types for umpa-history

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;
