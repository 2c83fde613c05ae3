//! Reconciliation result types.

use groupclose_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::ReconciliationStatus;

/// Outcome of matching one seller leg against one buyer leg.
///
/// Applied to both legs through
/// [`crate::repository::TransactionRepository::record_match`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    /// Seller-side leg.
    pub seller: TransactionId,
    /// Buyer-side leg.
    pub buyer: TransactionId,
    /// Classification of the pair.
    pub status: ReconciliationStatus,
    /// Absolute difference between the two effective amounts.
    pub amount_difference: Decimal,
    /// Absolute difference between the two transaction dates, in days.
    pub date_difference_days: i64,
    /// Weighted score the pair was accepted at.
    pub score: Decimal,
}

/// Summary of one `auto_reconcile` pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Legs loaded into the pass.
    pub total_legs: usize,
    /// Accepted pairs.
    pub matched_pairs: usize,
    /// Legs left unmatched.
    pub unmatched_legs: usize,
    /// Pairs with a zero amount difference.
    pub perfect_matches: usize,
    /// Pairs auto-adjusted within tolerance.
    pub auto_adjusted: usize,
    /// Pairs flagged for manual review.
    pub requires_review: usize,
    /// Sum of seller-side amounts across accepted pairs.
    pub total_matched_amount: Decimal,
    /// Sum of amount differences across accepted pairs.
    pub total_difference: Decimal,
    /// Mean amount difference per accepted pair.
    pub average_difference: Decimal,
    /// Matched legs over total legs, as a percentage.
    pub completion_rate: Decimal,
}

/// Status breakdown over stored legs, without mutating anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationOverview {
    /// All legs for the scope and period.
    pub total_transactions: usize,
    /// Legs in `PerfectMatch`.
    pub perfect_matches: usize,
    /// Legs in `AutoAdjusted`.
    pub auto_adjusted: usize,
    /// Legs in `RequiresReview`.
    pub requires_review: usize,
    /// Legs still unreconciled.
    pub unreconciled: usize,
    /// Sum of recorded amount differences.
    pub total_difference: Decimal,
    /// Reconciled legs over total legs, as a percentage.
    pub reconciliation_rate: Decimal,
}
