//! Account classification by account code.
//!
//! The group chart of accounts follows the CAS numbering convention: the
//! leading digit of an account code determines its class. Class totals and
//! minority-interest math rely on this classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account class derived from the leading digit of an account code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Asset accounts (`1xxx`).
    Asset,
    /// Liability accounts (`2xxx`).
    Liability,
    /// Equity accounts (`3xxx`).
    Equity,
    /// Cost accounts (`4xxx`-`5xxx`).
    Cost,
    /// Profit-and-loss accounts (`6xxx`).
    ProfitAndLoss,
    /// Unrecognized code prefix.
    Other,
}

impl AccountClass {
    /// Classifies an account code by its leading digit.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('1') => Self::Asset,
            Some('2') => Self::Liability,
            Some('3') => Self::Equity,
            Some('4' | '5') => Self::Cost,
            Some('6') => Self::ProfitAndLoss,
            _ => Self::Other,
        }
    }

    /// Returns true for classes whose normal balance is a credit.
    ///
    /// Liability and equity accounts accumulate on the credit side; asset
    /// and cost accounts on the debit side.
    #[must_use]
    pub const fn is_credit_normal(self) -> bool {
        matches!(self, Self::Liability | Self::Equity)
    }

    /// Signed balance of an account in this class, positive in the account's
    /// normal direction.
    #[must_use]
    pub fn signed_balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_credit_normal() {
            credit - debit
        } else {
            debit - credit
        }
    }
}
