//! Metadata source errors.

use std::io;
use thiserror::Error;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised while reading from, or writing to, the schema store.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The database driver reported an error.
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A snapshot file could not be read or written.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] io::Error),

    /// A snapshot file could not be decoded or encoded.
    #[error("snapshot is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog query returned a row without an expected column.
    #[error("query '{query}' returned no column '{column}'")]
    MissingColumn { query: String, column: String },

    /// Executing a statement against the store failed.
    #[error("failed to execute statement: {message}")]
    Execute {
        message: String,
        statement: String,
    },
}

impl MetadataError {
    pub fn missing_column(query: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            query: query.into(),
            column: column.into(),
        }
    }

    /// True for errors raised by the live connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Postgres(_) | Self::Execute { .. })
    }
}
