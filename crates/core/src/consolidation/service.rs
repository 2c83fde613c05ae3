//! The consolidation orchestrator.
//!
//! Sequences scope resolution, the mandatory reconciliation pass,
//! elimination generation, trial balance aggregation, and minority
//! interest, then persists run metadata. All generated adjustments for a
//! run are computed in memory and handed to the repository in one
//! `replace_generated` call, so a rerun for the same root and period
//! replaces the previous run's entries instead of stacking on top of
//! them. Run metadata is written last: a failed run leaves no row.

use chrono::{NaiveDate, Utc};
use groupclose_shared::config::EngineConfig;
use groupclose_shared::types::{EntityId, Period, RunId};
use tracing::{debug, info};

use crate::adjustment::Adjustment;
use crate::elimination::catalog::TemplateCatalog;
use crate::elimination::generator::generate_entries;
use crate::hierarchy::service::HierarchyService;
use crate::hierarchy::types::ScopeCriteria;
use crate::reconciliation::matcher::Matcher;
use crate::reconciliation::service::ReconciliationService;
use crate::repository::{
    AdjustmentRepository, EntityRepository, TrialBalanceProvider, TransactionRepository,
};
use crate::transaction::TransactionSide;

use super::aggregator;
use super::error::ConsolidationError;
use super::types::{
    ConsolidatedReport, ConsolidationRun, ReportType, RunStatus, TrialBalanceRow,
};

/// Orchestrates a consolidation run over the four collaborator contracts.
pub struct ConsolidationService<'a> {
    entities: &'a dyn EntityRepository,
    transactions: &'a dyn TransactionRepository,
    ledger: &'a dyn TrialBalanceProvider,
    adjustments: &'a dyn AdjustmentRepository,
    catalog: TemplateCatalog,
    config: EngineConfig,
}

impl<'a> ConsolidationService<'a> {
    /// Creates a service over the given collaborators. The template catalog
    /// is instantiated with the configured statutory tax rate.
    pub fn new(
        entities: &'a dyn EntityRepository,
        transactions: &'a dyn TransactionRepository,
        ledger: &'a dyn TrialBalanceProvider,
        adjustments: &'a dyn AdjustmentRepository,
        config: EngineConfig,
    ) -> Self {
        let catalog = TemplateCatalog::with_tax(&config.tax);
        Self {
            entities,
            transactions,
            ledger,
            adjustments,
            catalog,
            config,
        }
    }

    /// Produces the consolidated report for `(root, period)`.
    ///
    /// Runs the full pipeline: scope, reconciliation, elimination,
    /// aggregation, minority interest, run metadata. Rerunning with
    /// unchanged inputs yields an identical account table.
    pub fn generate_consolidated_report(
        &self,
        root: EntityId,
        period: Period,
        report_type: ReportType,
        criteria: Option<ScopeCriteria>,
    ) -> Result<ConsolidatedReport, ConsolidationError> {
        info!(root = %root, period = %period, "starting consolidation run");

        // 1. Scope.
        let hierarchy = HierarchyService::new(self.entities);
        let criteria = criteria.unwrap_or_default();
        let scope = hierarchy.consolidation_scope(root, &criteria)?;
        let scope_ids: Vec<EntityId> = scope.iter().map(|e| e.id).collect();

        // 2. Mandatory reconciliation pass.
        let reconciliation = ReconciliationService::new(
            self.transactions,
            Matcher::new(self.config.matching.clone()),
        )
        .auto_reconcile(&scope_ids, period, None)?;

        // 3. Eliminable intercompany legs within scope.
        let eliminable = self.transactions.eliminable(&scope_ids, period)?;

        // 4. Generate elimination entries. Each transaction is eliminated
        // once, driven by its seller leg; the buyer leg is the mirror of
        // the same economic event.
        let entry_date = period_end(period);
        let mut generated: Vec<Adjustment> = Vec::new();
        for leg in eliminable.iter().filter(|l| l.side == TransactionSide::Seller) {
            for template in self.catalog.applicable(leg) {
                let entries = generate_entries(template, leg, root, period, entry_date)?;
                generated.extend(entries);
            }
        }
        debug!(
            eliminable = eliminable.len(),
            generated = generated.len(),
            "elimination entries generated"
        );

        // Persist in one shot, replacing the previous run's entries.
        self.adjustments.replace_generated(root, period, &generated)?;

        // 5. Per-entity trial balances.
        let mut balances: Vec<(EntityId, Vec<TrialBalanceRow>)> =
            Vec::with_capacity(scope.len());
        for entity in &scope {
            balances.push((entity.id, self.ledger.trial_balance(entity.id, period)?));
        }

        // 6. Union and apply all adjustments on record, manual included.
        let applied = self.adjustments.for_period(root, period)?;
        let tables: Vec<Vec<TrialBalanceRow>> =
            balances.iter().map(|(_, rows)| rows.clone()).collect();
        let accounts = aggregator::consolidate(&tables, &applied);

        // 7. Minority interest on pre-merge balances.
        let minority_interest = aggregator::minority_interest(&scope, root, &balances);

        let totals = aggregator::class_totals(&accounts);

        // 8. Run metadata, written last.
        let run = ConsolidationRun {
            id: RunId::new(),
            parent_entity: root,
            period,
            report_type,
            scope: scope_ids,
            total_assets: totals.assets,
            total_liabilities: totals.liabilities,
            total_equity: totals.equity,
            elimination_count: generated.len(),
            minority_interest_total: minority_interest.total_amount,
            status: RunStatus::Completed,
            created_at: Utc::now(),
        };
        self.adjustments.insert_run(&run)?;

        info!(
            run = %run.id,
            entities = scope.len(),
            eliminations = run.elimination_count,
            minority = %run.minority_interest_total,
            "consolidation run completed"
        );

        Ok(ConsolidatedReport {
            scope,
            period,
            report_type,
            reconciliation,
            eliminable_transactions: eliminable.len(),
            elimination_count: generated.len(),
            minority_interest,
            accounts,
            run,
        })
    }
}

/// Last calendar day of a period; elimination entries are dated at period
/// end.
fn period_end(period: Period) -> NaiveDate {
    let (year, month) = if period.month == 12 {
        (period.year + 1, 1)
    } else {
        (period.year, period.month + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or_default()
}
