//! Error types for the disaster ETL library.
//!
//! Every failure belongs to one of three kinds: unreadable or malformed sources
//! ([`ErrorKind::Io`]), undecodable data ([`ErrorKind::Value`]) and rejected
//! writes ([`ErrorKind::Storage`]). None of them is recovered from; they abort the run.

use std::path::PathBuf;

/// Broad classification of an [`EtlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A source file is missing, unreadable, or lacks a required column.
    Io,
    /// The data cannot be decoded or violates a table invariant.
    Value,
    /// The destination store could not be opened or rejected the write.
    Storage,
}

/// Top-level error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("Failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed table: {message}")]
    Shape { message: String },

    #[error("Cannot derive category schema: {message}")]
    Schema { message: String },

    #[error("Row {row}: {message}")]
    Decode { row: usize, message: String },

    #[error("Storage error at {}: {source}", destination.display())]
    Storage {
        destination: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

impl EtlError {
    /// The taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::Source { .. } | EtlError::MissingColumn { .. } => ErrorKind::Io,
            EtlError::Shape { .. } | EtlError::Schema { .. } | EtlError::Decode { .. } => {
                ErrorKind::Value
            }
            EtlError::Storage { .. } => ErrorKind::Storage,
        }
    }

    pub(crate) fn decode(row: usize, message: impl Into<String>) -> Self {
        EtlError::Decode {
            row,
            message: message.into(),
        }
    }

    pub(crate) fn storage(destination: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        EtlError::Storage {
            destination: destination.into(),
            source,
        }
    }
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;
