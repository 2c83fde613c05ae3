//! Intercompany transaction domain types.
//!
//! Every intercompany transaction is recorded twice, once by each side. A leg
//! carries the recording entity, its counterparty, and which role the
//! recording entity played. A matched pair is mutually referential: the
//! seller leg's counterparty is the buyer leg's entity and vice versa.

use chrono::NaiveDate;
use groupclose_shared::types::{EntityId, Period, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business scenario of an intercompany transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    /// Sale of goods between group entities.
    GoodsSale,
    /// Provision of services between group entities.
    Service,
    /// Intercompany loans and other debt.
    Loan,
    /// Intercompany guarantees.
    Guarantee,
    /// Transfer of fixed or intangible assets.
    AssetTransfer,
    /// Anything else (equity pickups, special cases).
    Other,
}

/// Which role the recording entity played in the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSide {
    /// The recording entity sold goods, services, or assets.
    Seller,
    /// The recording entity bought goods, services, or assets.
    Buyer,
}

/// Reconciliation state of a transaction leg.
///
/// Terminal once matched within a run; only `Unreconciled` legs enter
/// subsequent matching passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// Not yet matched to a counterparty leg.
    Unreconciled,
    /// Matched with a zero amount difference.
    PerfectMatch,
    /// Matched with a difference inside tolerance, adjusted automatically.
    AutoAdjusted,
    /// Matched but the difference exceeds tolerance; manual review required.
    RequiresReview,
}

impl ReconciliationStatus {
    /// Returns true once the leg has been paired with a counterparty leg.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        !matches!(self, Self::Unreconciled)
    }
}

/// Elimination state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationStatus {
    /// Awaiting elimination in the next consolidation run.
    Pending,
    /// Fully eliminated.
    Eliminated,
    /// Some but not all applicable entries generated.
    PartiallyEliminated,
    /// Out of elimination scope (e.g. with entities outside the group).
    NotRequired,
}

/// One leg of an intercompany transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntercompanyTransaction {
    /// Leg identifier.
    pub id: TransactionId,
    /// The entity that recorded this leg.
    pub entity: EntityId,
    /// The other entity in the transaction.
    pub counterparty: EntityId,
    /// Role of the recording entity.
    pub side: TransactionSide,
    /// Business scenario.
    pub scenario: ScenarioType,
    /// Finer-grained scenario label consumed by elimination conditions
    /// (e.g. `"notes_payable"`, `"goodwill_recognition"`).
    pub sub_scenario: Option<String>,
    /// Transaction date.
    pub date: NaiveDate,
    /// Fiscal period the leg belongs to.
    pub period: Period,
    /// Amount in the transaction currency.
    pub amount: Decimal,
    /// ISO currency code of `amount`.
    pub currency: String,
    /// Amount translated to the group currency, when the transaction
    /// currency differs.
    pub converted_amount: Option<Decimal>,
    /// Account the recording entity booked the leg against.
    pub account_code: Option<String>,
    /// Whether the transaction must be eliminated on consolidation.
    pub needs_elimination: bool,
    /// Elimination state.
    pub elimination_status: EliminationStatus,
    /// Reconciliation state.
    pub reconciliation_status: ReconciliationStatus,
    /// Counterparty leg id once matched.
    pub matched_with: Option<TransactionId>,
    /// Absolute amount difference against the matched leg.
    pub amount_difference: Option<Decimal>,
    /// Absolute day difference against the matched leg.
    pub date_difference_days: Option<i64>,
    /// Whether the transaction carries profit not yet realized outside
    /// the group.
    pub has_unrealized_profit: bool,
    /// The unrealized portion, when known.
    pub unrealized_profit_amount: Option<Decimal>,
    /// Transaction-specific tax rate for deferred-tax entries.
    pub tax_rate: Option<Decimal>,
}

impl IntercompanyTransaction {
    /// Amount in the group currency: the converted amount when present,
    /// otherwise the raw amount.
    #[must_use]
    pub fn effective_amount(&self) -> Decimal {
        self.converted_amount.unwrap_or(self.amount)
    }

    /// The selling entity, regardless of which side recorded the leg.
    #[must_use]
    pub fn seller(&self) -> EntityId {
        match self.side {
            TransactionSide::Seller => self.entity,
            TransactionSide::Buyer => self.counterparty,
        }
    }

    /// The buying entity, regardless of which side recorded the leg.
    #[must_use]
    pub fn buyer(&self) -> EntityId {
        match self.side {
            TransactionSide::Seller => self.counterparty,
            TransactionSide::Buyer => self.entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg(side: TransactionSide) -> IntercompanyTransaction {
        IntercompanyTransaction {
            id: TransactionId::new(),
            entity: EntityId::new(),
            counterparty: EntityId::new(),
            side,
            scenario: ScenarioType::GoodsSale,
            sub_scenario: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            period: "2024-01".parse().unwrap(),
            amount: dec!(10_000),
            currency: "CNY".to_string(),
            converted_amount: None,
            account_code: None,
            needs_elimination: true,
            elimination_status: EliminationStatus::Pending,
            reconciliation_status: ReconciliationStatus::Unreconciled,
            matched_with: None,
            amount_difference: None,
            date_difference_days: None,
            has_unrealized_profit: false,
            unrealized_profit_amount: None,
            tax_rate: None,
        }
    }

    #[test]
    fn test_effective_amount_prefers_converted() {
        let mut txn = leg(TransactionSide::Seller);
        assert_eq!(txn.effective_amount(), dec!(10_000));
        txn.converted_amount = Some(dec!(72_000));
        assert_eq!(txn.effective_amount(), dec!(72_000));
    }

    #[test]
    fn test_seller_buyer_by_side() {
        let seller_leg = leg(TransactionSide::Seller);
        assert_eq!(seller_leg.seller(), seller_leg.entity);
        assert_eq!(seller_leg.buyer(), seller_leg.counterparty);

        let buyer_leg = leg(TransactionSide::Buyer);
        assert_eq!(buyer_leg.seller(), buyer_leg.counterparty);
        assert_eq!(buyer_leg.buyer(), buyer_leg.entity);
    }

    #[test]
    fn test_matched_statuses() {
        assert!(!ReconciliationStatus::Unreconciled.is_matched());
        assert!(ReconciliationStatus::PerfectMatch.is_matched());
        assert!(ReconciliationStatus::AutoAdjusted.is_matched());
        assert!(ReconciliationStatus::RequiresReview.is_matched());
    }
}
