//! Reconciliation service: loads legs, runs the matching pass, persists
//! match outcomes, and summarizes the result.

use groupclose_shared::types::{EntityId, Period};
use rust_decimal::Decimal;
use tracing::info;

use crate::repository::TransactionRepository;
use crate::transaction::{ReconciliationStatus, ScenarioType, TransactionSide};

use super::error::ReconciliationError;
use super::matcher::Matcher;
use super::types::{ReconciliationOverview, ReconciliationSummary};

/// Service over [`TransactionRepository`] driving reconciliation.
pub struct ReconciliationService<'a> {
    transactions: &'a dyn TransactionRepository,
    matcher: Matcher,
}

impl<'a> ReconciliationService<'a> {
    /// Creates a service with the given repository and matcher.
    pub fn new(transactions: &'a dyn TransactionRepository, matcher: Matcher) -> Self {
        Self {
            transactions,
            matcher,
        }
    }

    /// Matches unreconciled legs for the given entities and period.
    ///
    /// Loads unreconciled, elimination-needed legs, runs one matching pass,
    /// records every accepted pair on both legs, and returns the summary.
    /// Already-matched legs never re-enter; a second pass over unchanged
    /// data matches nothing new.
    pub fn auto_reconcile(
        &self,
        entities: &[EntityId],
        period: Period,
        scenario: Option<ScenarioType>,
    ) -> Result<ReconciliationSummary, ReconciliationError> {
        let legs = self.transactions.unreconciled(entities, period, scenario)?;
        info!(
            entities = entities.len(),
            period = %period,
            legs = legs.len(),
            "starting auto-reconciliation"
        );

        if legs.is_empty() {
            return Ok(ReconciliationSummary::default());
        }

        let updates = self.matcher.match_pass(&legs);
        for update in &updates {
            self.transactions.record_match(update)?;
        }

        let matched_pairs = updates.len();
        let perfect_matches = updates
            .iter()
            .filter(|u| u.status == ReconciliationStatus::PerfectMatch)
            .count();
        let auto_adjusted = updates
            .iter()
            .filter(|u| u.status == ReconciliationStatus::AutoAdjusted)
            .count();
        let requires_review = updates
            .iter()
            .filter(|u| u.status == ReconciliationStatus::RequiresReview)
            .count();

        let total_matched_amount: Decimal = updates
            .iter()
            .filter_map(|u| {
                legs.iter()
                    .find(|l| l.id == u.seller)
                    .map(|l| l.effective_amount())
            })
            .sum();
        let total_difference: Decimal = updates.iter().map(|u| u.amount_difference).sum();
        let average_difference = if matched_pairs == 0 {
            Decimal::ZERO
        } else {
            total_difference / Decimal::from(matched_pairs)
        };
        let completion_rate = Decimal::from(matched_pairs * 2) * Decimal::from(100)
            / Decimal::from(legs.len());

        let summary = ReconciliationSummary {
            total_legs: legs.len(),
            matched_pairs,
            unmatched_legs: legs.len() - matched_pairs * 2,
            perfect_matches,
            auto_adjusted,
            requires_review,
            total_matched_amount,
            total_difference,
            average_difference,
            completion_rate,
        };

        info!(
            matched = summary.matched_pairs,
            auto_adjusted = summary.auto_adjusted,
            requires_review = summary.requires_review,
            completion = %summary.completion_rate,
            "auto-reconciliation completed"
        );
        Ok(summary)
    }

    /// Read-only status breakdown over all legs for the scope and period.
    pub fn overview(
        &self,
        entities: &[EntityId],
        period: Period,
    ) -> Result<ReconciliationOverview, ReconciliationError> {
        let legs = self.transactions.by_period(entities, period)?;

        let count = |status: ReconciliationStatus| {
            legs.iter()
                .filter(|l| l.reconciliation_status == status)
                .count()
        };

        let unreconciled = count(ReconciliationStatus::Unreconciled);
        // Differences are recorded on both legs; sum the seller side only.
        let total_difference = legs
            .iter()
            .filter(|l| l.side == TransactionSide::Seller)
            .filter_map(|l| l.amount_difference)
            .sum();
        let reconciliation_rate = if legs.is_empty() {
            Decimal::ZERO
        } else {
            Decimal::from(legs.len() - unreconciled) * Decimal::from(100)
                / Decimal::from(legs.len())
        };

        Ok(ReconciliationOverview {
            total_transactions: legs.len(),
            perfect_matches: count(ReconciliationStatus::PerfectMatch),
            auto_adjusted: count(ReconciliationStatus::AutoAdjusted),
            requires_review: count(ReconciliationStatus::RequiresReview),
            unreconciled,
            total_difference,
            reconciliation_rate,
        })
    }
}
