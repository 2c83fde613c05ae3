//! Candidate scoring and the greedy matching pass.

use std::collections::HashSet;

use groupclose_shared::config::MatchConfig;
use groupclose_shared::types::TransactionId;
use rust_decimal::Decimal;
use tracing::debug;

use crate::transaction::{IntercompanyTransaction, ReconciliationStatus, TransactionSide};

use super::types::MatchUpdate;

/// Scores and pairs counterparty transaction legs.
///
/// Matching is greedy first-fit per seller leg in input order, not a
/// globally optimal assignment. One-to-one pairing is enforced with an
/// explicit set of consumed buyer ids; legs are never mutated mid-pass.
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the given tolerances and weights.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Weighted similarity score of two legs, in [0, 1].
    ///
    /// Amount similarity decays linearly from 1 at zero difference to 0 at
    /// the amount tolerance; date proximity decays the same way over the day
    /// tolerance; scenario and currency contribute their full weight on
    /// equality.
    #[must_use]
    pub fn score(&self, seller: &IntercompanyTransaction, buyer: &IntercompanyTransaction) -> Decimal {
        let weights = &self.config.weights;
        let mut score = Decimal::ZERO;

        let amount_diff = (seller.effective_amount() - buyer.effective_amount()).abs();
        if amount_diff.is_zero() {
            score += weights.amount;
        } else if amount_diff <= self.config.tolerance_amount {
            score += weights.amount
                * (Decimal::ONE - amount_diff / self.config.tolerance_amount);
        }

        let date_diff = (seller.date - buyer.date).num_days().abs();
        if date_diff == 0 {
            score += weights.date;
        } else if date_diff <= self.config.tolerance_days {
            score += weights.date
                * (Decimal::ONE
                    - Decimal::from(date_diff) / Decimal::from(self.config.tolerance_days));
        }

        if seller.scenario == buyer.scenario {
            score += weights.scenario;
        }

        if seller.currency == buyer.currency {
            score += weights.currency;
        }

        score
    }

    /// Classifies an accepted pair by its amount difference.
    #[must_use]
    pub fn classify(&self, amount_difference: Decimal) -> ReconciliationStatus {
        if amount_difference.is_zero() {
            ReconciliationStatus::PerfectMatch
        } else if amount_difference <= self.config.tolerance_amount && self.config.auto_adjust {
            ReconciliationStatus::AutoAdjusted
        } else {
            ReconciliationStatus::RequiresReview
        }
    }

    /// Pairs seller legs with buyer legs out of one unreconciled batch.
    ///
    /// A buyer leg is a candidate for a seller leg only when the pair is
    /// mutually referential (each names the other as counterparty). The
    /// highest-scoring candidate at or above the minimum score wins; every
    /// consumed buyer id is excluded from later sellers.
    #[must_use]
    pub fn match_pass(&self, transactions: &[IntercompanyTransaction]) -> Vec<MatchUpdate> {
        let sellers: Vec<&IntercompanyTransaction> = transactions
            .iter()
            .filter(|t| t.side == TransactionSide::Seller)
            .collect();
        let buyers: Vec<&IntercompanyTransaction> = transactions
            .iter()
            .filter(|t| t.side == TransactionSide::Buyer)
            .collect();

        debug!(
            sellers = sellers.len(),
            buyers = buyers.len(),
            "matching seller legs against buyer legs"
        );

        let mut consumed: HashSet<TransactionId> = HashSet::new();
        let mut updates = Vec::new();

        for seller in sellers {
            let mut best: Option<(&IntercompanyTransaction, Decimal)> = None;

            for buyer in &buyers {
                if consumed.contains(&buyer.id) {
                    continue;
                }
                if seller.counterparty != buyer.entity || seller.entity != buyer.counterparty {
                    continue;
                }

                let score = self.score(seller, buyer);
                if score < self.config.min_score {
                    continue;
                }
                match best {
                    Some((_, best_score)) if score <= best_score => {}
                    _ => best = Some((buyer, score)),
                }
            }

            if let Some((buyer, score)) = best {
                consumed.insert(buyer.id);
                let amount_difference =
                    (seller.effective_amount() - buyer.effective_amount()).abs();
                let date_difference_days = (seller.date - buyer.date).num_days().abs();
                updates.push(MatchUpdate {
                    seller: seller.id,
                    buyer: buyer.id,
                    status: self.classify(amount_difference),
                    amount_difference,
                    date_difference_days,
                    score,
                });
            }
        }

        updates
    }
}
