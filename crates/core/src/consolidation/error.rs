//! Consolidation error types.

use groupclose_shared::error::RepositoryError;
use thiserror::Error;

use crate::elimination::error::EliminationError;
use crate::hierarchy::error::HierarchyError;
use crate::reconciliation::error::ReconciliationError;

/// Errors raised by the consolidation pipeline.
///
/// Any failure before run metadata is persisted leaves no
/// `ConsolidationRun` row and no partially replaced adjustments.
#[derive(Debug, Error)]
pub enum ConsolidationError {
    /// Scope resolution or hierarchy lookup failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    /// The mandatory reconciliation pass failed.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    /// Elimination entry generation failed.
    #[error(transparent)]
    Elimination(#[from] EliminationError),

    /// A collaborator failed; propagated unchanged, no retry.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ConsolidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Hierarchy(e) => e.error_code(),
            Self::Reconciliation(e) => e.error_code(),
            Self::Elimination(e) => e.error_code(),
            Self::Repository(e) => e.error_code(),
        }
    }
}
