//! Elimination error types.

use groupclose_shared::types::TransactionId;
use thiserror::Error;

use super::template::AmountField;

/// Errors raised by template validation and entry generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EliminationError {
    /// A formula references a field the transaction does not carry. This
    /// fails loudly: a missing operand is a data problem, not a zero.
    #[error("Template {template_id}: field {field:?} cannot be resolved for transaction {transaction}")]
    UnresolvableField {
        /// Template whose formula failed.
        template_id: String,
        /// The unresolvable operand.
        field: AmountField,
        /// Transaction the formula was evaluated against.
        transaction: TransactionId,
    },

    /// A condition is structurally invalid (empty composite, blank label).
    #[error("Template {template_id}: invalid condition: {reason}")]
    InvalidCondition {
        /// Template carrying the condition.
        template_id: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl EliminationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnresolvableField { .. } => "UNRESOLVABLE_FORMULA_FIELD",
            Self::InvalidCondition { .. } => "INVALID_CONDITION",
        }
    }
}
