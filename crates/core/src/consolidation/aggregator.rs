//! Pure aggregation math: trial balance union, adjustment application,
//! minority interest, and class totals.

use std::collections::BTreeMap;

use groupclose_shared::types::{AccountClass, EntityId};
use rust_decimal::Decimal;

use crate::adjustment::Adjustment;
use crate::hierarchy::types::Entity;

use super::types::{ClassTotals, ConsolidatedAccount, MinorityInterest, MinorityStake, TrialBalanceRow};

/// Unions per-entity trial balances and applies elimination adjustments.
///
/// Rows are grouped by account code with debits and credits summed; the
/// account name is taken from the first occurrence of a code. Each
/// adjustment adds its amount to the debit account's debit total and the
/// credit account's credit total, creating rows as needed. Balances are
/// `debit - credit` and the table is sorted by account code.
#[must_use]
pub fn consolidate(
    trial_balances: &[Vec<TrialBalanceRow>],
    adjustments: &[Adjustment],
) -> Vec<ConsolidatedAccount> {
    let mut merged: BTreeMap<String, ConsolidatedAccount> = BTreeMap::new();

    for rows in trial_balances {
        for row in rows {
            merged
                .entry(row.account_code.clone())
                .and_modify(|account| {
                    account.debit += row.debit;
                    account.credit += row.credit;
                })
                .or_insert_with(|| ConsolidatedAccount {
                    account_code: row.account_code.clone(),
                    account_name: row.account_name.clone(),
                    debit: row.debit,
                    credit: row.credit,
                    balance: Decimal::ZERO,
                });
        }
    }

    for adjustment in adjustments {
        merged
            .entry(adjustment.debit_account_code.clone())
            .and_modify(|account| account.debit += adjustment.amount)
            .or_insert_with(|| ConsolidatedAccount {
                account_code: adjustment.debit_account_code.clone(),
                account_name: adjustment.debit_account_name.clone(),
                debit: adjustment.amount,
                credit: Decimal::ZERO,
                balance: Decimal::ZERO,
            });
        merged
            .entry(adjustment.credit_account_code.clone())
            .and_modify(|account| account.credit += adjustment.amount)
            .or_insert_with(|| ConsolidatedAccount {
                account_code: adjustment.credit_account_code.clone(),
                account_name: adjustment.credit_account_name.clone(),
                debit: Decimal::ZERO,
                credit: adjustment.amount,
                balance: Decimal::ZERO,
            });
    }

    let mut accounts: Vec<ConsolidatedAccount> = merged.into_values().collect();
    for account in &mut accounts {
        account.balance = account.debit - account.credit;
    }
    accounts
}

/// Minority interest for every non-root scoped entity with an effective
/// ownership below 100%.
///
/// The minority share is computed on each entity's own (pre-merge) trial
/// balance: the sum of its equity-class balances, in the credit-normal
/// direction, times `(100 - effective) / 100`.
#[must_use]
pub fn minority_interest(
    scope: &[Entity],
    root: EntityId,
    balances: &[(EntityId, Vec<TrialBalanceRow>)],
) -> MinorityInterest {
    let mut result = MinorityInterest::default();
    let hundred = Decimal::from(100);

    for entity in scope.iter().filter(|e| e.id != root) {
        let minority_pct = hundred - entity.effective_ownership;
        if minority_pct <= Decimal::ZERO {
            continue;
        }
        let equity: Decimal = balances
            .iter()
            .filter(|(id, _)| *id == entity.id)
            .flat_map(|(_, rows)| rows.iter())
            .filter(|row| AccountClass::from_code(&row.account_code) == AccountClass::Equity)
            .map(|row| AccountClass::Equity.signed_balance(row.debit, row.credit))
            .sum();
        let amount = equity * minority_pct / hundred;
        result.total_amount += amount;
        result.stakes.push(MinorityStake {
            entity: entity.id,
            entity_code: entity.code.clone(),
            entity_name: entity.name.clone(),
            effective_ownership: entity.effective_ownership,
            minority_pct,
            equity,
            amount,
        });
    }

    result
}

/// Signed asset, liability, and equity totals of a consolidated table.
#[must_use]
pub fn class_totals(accounts: &[ConsolidatedAccount]) -> ClassTotals {
    let mut totals = ClassTotals::default();
    for account in accounts {
        let class = AccountClass::from_code(&account.account_code);
        let signed = class.signed_balance(account.debit, account.credit);
        match class {
            AccountClass::Asset => totals.assets += signed,
            AccountClass::Liability => totals.liabilities += signed,
            AccountClass::Equity => totals.equity += signed,
            _ => {}
        }
    }
    totals
}
