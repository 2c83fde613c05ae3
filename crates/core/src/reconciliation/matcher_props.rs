//! Property-based tests for the matching pass.
//!
//! - Matching is one-to-one: no leg appears in more than one accepted pair.
//! - Scores stay in [0, 1] and accepted pairs meet the minimum score.

use proptest::prelude::*;
use rust_decimal::Decimal;

use groupclose_shared::config::MatchConfig;
use groupclose_shared::types::EntityId;

use super::matcher::tests::leg;
use super::matcher::Matcher;
use crate::transaction::{IntercompanyTransaction, TransactionSide};

/// Strategy for amounts near a common base, so some pairs fall inside the
/// tolerance and some outside.
fn amount() -> impl Strategy<Value = Decimal> {
    (9_900i64..10_300i64).prop_map(Decimal::from)
}

fn day() -> impl Strategy<Value = u32> {
    1u32..28
}

fn batch() -> impl Strategy<Value = Vec<(bool, Decimal, u32)>> {
    prop::collection::vec((any::<bool>(), amount(), day()), 0..24)
}

proptest! {
    #[test]
    fn prop_matching_is_one_to_one(shape in batch()) {
        let a = EntityId::new();
        let b = EntityId::new();
        let legs: Vec<IntercompanyTransaction> = shape
            .into_iter()
            .map(|(is_seller, amount, dom)| {
                if is_seller {
                    leg(a, b, TransactionSide::Seller, amount, dom)
                } else {
                    leg(b, a, TransactionSide::Buyer, amount, dom)
                }
            })
            .collect();

        let matcher = Matcher::new(MatchConfig::default());
        let updates = matcher.match_pass(&legs);

        let mut seen = std::collections::HashSet::new();
        for update in &updates {
            prop_assert!(seen.insert(update.seller), "seller matched twice");
            prop_assert!(seen.insert(update.buyer), "buyer matched twice");
        }
    }

    #[test]
    fn prop_scores_bounded_and_gated(shape in batch()) {
        let a = EntityId::new();
        let b = EntityId::new();
        let legs: Vec<IntercompanyTransaction> = shape
            .into_iter()
            .map(|(is_seller, amount, dom)| {
                if is_seller {
                    leg(a, b, TransactionSide::Seller, amount, dom)
                } else {
                    leg(b, a, TransactionSide::Buyer, amount, dom)
                }
            })
            .collect();

        let config = MatchConfig::default();
        let min_score = config.min_score;
        let matcher = Matcher::new(config);

        for update in matcher.match_pass(&legs) {
            prop_assert!(update.score >= min_score);
            prop_assert!(update.score <= Decimal::ONE);
            prop_assert!(update.amount_difference >= Decimal::ZERO);
            prop_assert!(update.date_difference_days >= 0);
        }
    }
}
