//! Hierarchy error types.

use groupclose_shared::error::RepositoryError;
use groupclose_shared::types::EntityId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by hierarchy operations.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// Ownership percentage outside (0, 100].
    #[error("Ownership percentage must be in (0, 100], got {0}")]
    InvalidOwnership(Decimal),

    /// Entity code already in use.
    #[error("Entity code '{0}' already exists")]
    DuplicateCode(String),

    /// Referenced parent does not exist.
    #[error("Parent entity not found: {0}")]
    ParentNotFound(EntityId),

    /// Entity not found.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// No entity satisfies the consolidation criteria.
    #[error("No entities in consolidation scope for root {root}")]
    ScopeEmpty {
        /// Consolidation root that produced the empty scope.
        root: EntityId,
    },

    /// Entity still has children and cascade was not requested.
    #[error("Entity {entity} has {child_count} children; delete with cascade to remove them")]
    HasChildren {
        /// Entity being deleted.
        entity: EntityId,
        /// Number of direct children blocking the delete.
        child_count: usize,
    },

    /// Collaborator failure, propagated unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl HierarchyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidOwnership(_) => "INVALID_OWNERSHIP",
            Self::DuplicateCode(_) => "DUPLICATE_ENTITY_CODE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            Self::ScopeEmpty { .. } => "SCOPE_EMPTY",
            Self::HasChildren { .. } => "ENTITY_HAS_CHILDREN",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HierarchyError::InvalidOwnership(dec!(120)).error_code(),
            "INVALID_OWNERSHIP"
        );
        assert_eq!(
            HierarchyError::DuplicateCode("E001".to_string()).error_code(),
            "DUPLICATE_ENTITY_CODE"
        );
        assert_eq!(
            HierarchyError::ScopeEmpty {
                root: EntityId::new()
            }
            .error_code(),
            "SCOPE_EMPTY"
        );
    }

    #[test]
    fn test_display() {
        let err = HierarchyError::InvalidOwnership(dec!(0));
        assert_eq!(
            err.to_string(),
            "Ownership percentage must be in (0, 100], got 0"
        );
    }
}
