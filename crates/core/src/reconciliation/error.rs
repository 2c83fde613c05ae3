//! Reconciliation error types.

use groupclose_shared::error::RepositoryError;
use thiserror::Error;

/// Errors raised during reconciliation.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// Collaborator failure, propagated unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ReconciliationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}
