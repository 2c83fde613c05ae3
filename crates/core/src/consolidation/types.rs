//! Consolidation report and run-metadata types.

use chrono::{DateTime, Utc};
use groupclose_shared::types::{EntityId, Period, RunId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::hierarchy::types::Entity;
use crate::reconciliation::types::ReconciliationSummary;

/// One account's debit and credit totals for a single entity and period,
/// as reported by the external ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Period debit total.
    pub debit: Decimal,
    /// Period credit total.
    pub credit: Decimal,
}

/// One row of the consolidated account table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedAccount {
    /// Account code.
    pub account_code: String,
    /// Account name, taken from the first entity reporting the code.
    pub account_name: String,
    /// Summed debit total including applied adjustments.
    pub debit: Decimal,
    /// Summed credit total including applied adjustments.
    pub credit: Decimal,
    /// `debit - credit`.
    pub balance: Decimal,
}

/// Minority interest attributable to one scoped entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinorityStake {
    /// The partially owned entity.
    pub entity: EntityId,
    /// Its entity code.
    pub entity_code: String,
    /// Its display name.
    pub entity_name: String,
    /// Effective group ownership percentage.
    pub effective_ownership: Decimal,
    /// `100 - effective_ownership`.
    pub minority_pct: Decimal,
    /// Equity-class balance of the entity's own trial balance.
    pub equity: Decimal,
    /// `equity * minority_pct / 100`.
    pub amount: Decimal,
}

/// Minority interest total with the per-entity breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinorityInterest {
    /// Sum over all stakes.
    pub total_amount: Decimal,
    /// Per-entity breakdown, scope order.
    pub stakes: Vec<MinorityStake>,
}

/// Report flavor requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Balance sheet oriented report.
    BalanceSheet,
    /// Income statement oriented report.
    IncomeStatement,
    /// Full account table.
    Full,
}

/// Lifecycle state of a consolidation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Run in progress.
    InProgress,
    /// Run completed successfully.
    Completed,
    /// Run aborted with an error.
    Failed,
    /// Run cancelled by the caller.
    Cancelled,
}

/// Signed class totals of a consolidated account table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassTotals {
    /// Asset accounts (`1xxx`), debit-normal.
    pub assets: Decimal,
    /// Liability accounts (`2xxx`), credit-normal.
    pub liabilities: Decimal,
    /// Equity accounts (`3xxx`), credit-normal.
    pub equity: Decimal,
}

/// Persisted metadata of one consolidation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationRun {
    /// Run identifier.
    pub id: RunId,
    /// Consolidation root.
    pub parent_entity: EntityId,
    /// Fiscal period consolidated.
    pub period: Period,
    /// Report flavor.
    pub report_type: ReportType,
    /// Ids of every entity in scope, root included.
    pub scope: Vec<EntityId>,
    /// Signed asset total.
    pub total_assets: Decimal,
    /// Signed liability total.
    pub total_liabilities: Decimal,
    /// Signed equity total.
    pub total_equity: Decimal,
    /// Number of elimination adjustments generated.
    pub elimination_count: usize,
    /// Minority interest total.
    pub minority_interest_total: Decimal,
    /// Final lifecycle state.
    pub status: RunStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The full result bundle of `generate_consolidated_report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedReport {
    /// Entities in scope, root first.
    pub scope: Vec<Entity>,
    /// Period consolidated.
    pub period: Period,
    /// Report flavor.
    pub report_type: ReportType,
    /// Outcome of the mandatory reconciliation pass.
    pub reconciliation: ReconciliationSummary,
    /// Intercompany legs still flagged for elimination in scope.
    pub eliminable_transactions: usize,
    /// Elimination adjustments generated and persisted.
    pub elimination_count: usize,
    /// Minority interest total and breakdown.
    pub minority_interest: MinorityInterest,
    /// Consolidated account table, sorted by account code.
    pub accounts: Vec<ConsolidatedAccount>,
    /// Persisted run metadata.
    pub run: ConsolidationRun,
}
