//! Storage-specific error type wrapping sqlx errors.

use casebook_domain::error::{CasebookError, ConflictError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to serialize or deserialize a stored JSON value.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for CasebookError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                ConflictError::Duplicate(db.message().to_string()).into()
            }
            other => Self::Storage(Box::new(other)),
        }
    }
}
