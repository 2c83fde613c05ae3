//! Consolidation adjustments and the reversal audit trail.
//!
//! An adjustment is a balanced two-sided journal entry: one debit account,
//! one credit account, a single positive amount. Adjustments are immutable
//! after insertion; undoing one means inserting an offsetting reversal, never
//! editing the original.

use chrono::NaiveDate;
use groupclose_shared::types::{AdjustmentId, EntityId, Period, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an adjustment came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentOrigin {
    /// Produced by the elimination generator during a consolidation run.
    /// Replaced wholesale when the same (root, period) is rerun.
    Generated,
    /// Entered by an accountant.
    Manual,
    /// Offsetting entry created by [`Adjustment::reversing`].
    Reversal,
}

/// A balanced consolidation journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Adjustment identifier.
    pub id: AdjustmentId,
    /// Consolidation root the adjustment belongs to.
    pub parent_entity: EntityId,
    /// Fiscal period.
    pub period: Period,
    /// Provenance of the entry.
    pub origin: AdjustmentOrigin,
    /// Booking date.
    pub entry_date: NaiveDate,
    /// Debit account code.
    pub debit_account_code: String,
    /// Debit account name.
    pub debit_account_name: String,
    /// Credit account code.
    pub credit_account_code: String,
    /// Credit account name.
    pub credit_account_name: String,
    /// Entry amount; debit and credit are equal by construction.
    pub amount: Decimal,
    /// Transaction that gave rise to the entry, when generated.
    pub source_transaction: Option<TransactionId>,
    /// Elimination template that produced the entry, when generated.
    pub template_id: Option<String>,
    /// Free-form note for the audit trail.
    pub memo: String,
    /// Set once an offsetting reversal has been recorded.
    pub reversed_by: Option<AdjustmentId>,
}

impl Adjustment {
    /// Builds the offsetting entry for this adjustment: debit and credit
    /// accounts swapped, same amount, same period and root.
    ///
    /// The caller persists the returned entry and marks this one as reversed;
    /// this method has no side effects.
    #[must_use]
    pub fn reversing(&self, entry_date: NaiveDate) -> Adjustment {
        Adjustment {
            id: AdjustmentId::new(),
            parent_entity: self.parent_entity,
            period: self.period,
            origin: AdjustmentOrigin::Reversal,
            entry_date,
            debit_account_code: self.credit_account_code.clone(),
            debit_account_name: self.credit_account_name.clone(),
            credit_account_code: self.debit_account_code.clone(),
            credit_account_name: self.debit_account_name.clone(),
            amount: self.amount,
            source_transaction: self.source_transaction,
            template_id: self.template_id.clone(),
            memo: format!("Reversal of adjustment {}", self.id),
            reversed_by: None,
        }
    }
}
