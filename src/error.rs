// src/error.rs
use mongodb::error::{ErrorKind, WriteFailure};
use std::path::PathBuf;
use thiserror::Error;

/// Server error code for `NamespaceExists`.
pub const NAMESPACE_EXISTS: i32 = 48;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Validation error in record {index}: {reason}")]
    Validation { index: usize, reason: String },

    #[error("Collection '{0}' already exists")]
    DuplicateCollection(String),

    #[error("Fixture error in {}: {reason}", path.display())]
    Fixture { path: PathBuf, reason: String },

    #[error("MongoDB error: {0}")]
    Store(mongodb::error::Error),
}

impl SeedError {
    pub(crate) fn fixture(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SeedError::Fixture {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Shifts a validation index by `offset`, for errors raised inside a batch.
    pub(crate) fn offset(self, offset: usize) -> Self {
        match self {
            SeedError::Validation { index, reason } => SeedError::Validation {
                index: index + offset,
                reason,
            },
            other => other,
        }
    }

    /// True when the server refused to create a collection that already exists.
    pub fn is_namespace_exists(&self) -> bool {
        match self {
            SeedError::DuplicateCollection(_) => true,
            SeedError::Store(err) => matches!(
                err.kind.as_ref(),
                ErrorKind::Command(cmd) if cmd.code == NAMESPACE_EXISTS
            ),
            _ => false,
        }
    }
}

impl From<mongodb::error::Error> for SeedError {
    fn from(err: mongodb::error::Error) -> Self {
        let classified = match err.kind.as_ref() {
            ErrorKind::ServerSelection { message, .. }
            | ErrorKind::Authentication { message, .. }
            | ErrorKind::DnsResolve { message, .. }
            | ErrorKind::ConnectionPoolCleared { message, .. } => {
                Some(SeedError::Connection(message.clone()))
            }
            ErrorKind::Io(io) => Some(SeedError::Connection(io.to_string())),
            ErrorKind::InsertMany(failure) => failure
                .write_errors
                .as_ref()
                .and_then(|errors| errors.first())
                .map(|write_error| SeedError::Validation {
                    index: write_error.index,
                    reason: write_error.message.clone(),
                }),
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(SeedError::Validation {
                index: 0,
                reason: write_error.message.clone(),
            }),
            ErrorKind::BsonSerialization(ser) => Some(SeedError::Validation {
                index: 0,
                reason: ser.to_string(),
            }),
            _ => None,
        };
        classified.unwrap_or(SeedError::Store(err))
    }
}
