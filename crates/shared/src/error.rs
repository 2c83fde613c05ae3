//! Repository-level error types.
//!
//! The engine core never talks to storage directly; it goes through the
//! repository traits. Collaborator failures surface as `RepositoryError`
//! and are propagated unchanged - recovery policy belongs to the caller.

use thiserror::Error;

/// Result type alias using `RepositoryError`.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by repository collaborators.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (e.g., duplicate entity code).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The underlying store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Returns the error code for structured reporting.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
