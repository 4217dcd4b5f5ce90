//! Store error types

use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create store directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Corrupt record {id}: {message}")]
    Corrupt { id: i64, message: String },
}
