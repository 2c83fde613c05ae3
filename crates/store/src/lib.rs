//! In-memory implementations of the Groupclose repository contracts.
//!
//! [`MemoryStore`] keeps all records in a single mutex-guarded state and
//! implements every collaborator trait from `groupclose-core`. It backs the
//! integration tests and lets embedders run the engine without a database.
//! The engine's execution model is single-threaded and synchronous; the
//! mutex only guards against accidental cross-thread sharing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use groupclose_core::adjustment::{Adjustment, AdjustmentOrigin};
use groupclose_core::consolidation::types::{ConsolidationRun, TrialBalanceRow};
use groupclose_core::hierarchy::types::{Entity, EntityRelationship};
use groupclose_core::reconciliation::types::MatchUpdate;
use groupclose_core::repository::{
    AdjustmentRepository, EntityRepository, TrialBalanceProvider, TransactionRepository,
};
use groupclose_core::transaction::{
    EliminationStatus, IntercompanyTransaction, ReconciliationStatus, ScenarioType,
};
use groupclose_shared::error::{RepositoryError, RepositoryResult};
use groupclose_shared::types::{AdjustmentId, EntityId, Period, TransactionId};

#[derive(Default)]
struct State {
    entities: HashMap<EntityId, Entity>,
    relationships: Vec<EntityRelationship>,
    transactions: HashMap<TransactionId, IntercompanyTransaction>,
    adjustments: HashMap<AdjustmentId, Adjustment>,
    runs: Vec<ConsolidationRun>,
    trial_balances: HashMap<(EntityId, Period), Vec<TrialBalanceRow>>,
}

/// In-memory store implementing all four repository contracts.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> RepositoryResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
    }

    /// Seeds an intercompany transaction leg.
    pub fn seed_transaction(&self, txn: IntercompanyTransaction) -> RepositoryResult<()> {
        self.state()?.transactions.insert(txn.id, txn);
        Ok(())
    }

    /// Seeds the trial balance reported for an entity and period.
    pub fn seed_trial_balance(
        &self,
        entity: EntityId,
        period: Period,
        rows: Vec<TrialBalanceRow>,
    ) -> RepositoryResult<()> {
        self.state()?.trial_balances.insert((entity, period), rows);
        Ok(())
    }

    /// Fetches a transaction leg by id.
    pub fn transaction(
        &self,
        id: TransactionId,
    ) -> RepositoryResult<Option<IntercompanyTransaction>> {
        Ok(self.state()?.transactions.get(&id).cloned())
    }
}

impl EntityRepository for MemoryStore {
    fn insert(
        &self,
        entity: &Entity,
        relationship: Option<&EntityRelationship>,
    ) -> RepositoryResult<()> {
        let mut state = self.state()?;
        if state.entities.values().any(|e| e.code == entity.code) {
            return Err(RepositoryError::Conflict(format!(
                "entity code '{}' already exists",
                entity.code
            )));
        }
        state.entities.insert(entity.id, entity.clone());
        if let Some(rel) = relationship {
            state.relationships.push(rel.clone());
        }
        Ok(())
    }

    fn get(&self, id: EntityId) -> RepositoryResult<Option<Entity>> {
        Ok(self.state()?.entities.get(&id).cloned())
    }

    fn by_code(&self, code: &str) -> RepositoryResult<Option<Entity>> {
        Ok(self
            .state()?
            .entities
            .values()
            .find(|e| e.code == code)
            .cloned())
    }

    fn all(&self) -> RepositoryResult<Vec<Entity>> {
        Ok(self.state()?.entities.values().cloned().collect())
    }

    fn update(&self, entity: &Entity) -> RepositoryResult<()> {
        let mut state = self.state()?;
        if !state.entities.contains_key(&entity.id) {
            return Err(RepositoryError::NotFound(format!("entity {}", entity.id)));
        }
        state.entities.insert(entity.id, entity.clone());
        Ok(())
    }

    fn delete(&self, ids: &[EntityId]) -> RepositoryResult<()> {
        let mut state = self.state()?;
        for id in ids {
            state.entities.remove(id);
        }
        state
            .relationships
            .retain(|r| !ids.contains(&r.parent) && !ids.contains(&r.child));
        Ok(())
    }

    fn relationships(&self, parent: EntityId) -> RepositoryResult<Vec<EntityRelationship>> {
        Ok(self
            .state()?
            .relationships
            .iter()
            .filter(|r| r.parent == parent)
            .cloned()
            .collect())
    }
}

impl TransactionRepository for MemoryStore {
    fn unreconciled(
        &self,
        entities: &[EntityId],
        period: Period,
        scenario: Option<ScenarioType>,
    ) -> RepositoryResult<Vec<IntercompanyTransaction>> {
        let mut legs: Vec<IntercompanyTransaction> = self
            .state()?
            .transactions
            .values()
            .filter(|l| entities.contains(&l.entity))
            .filter(|l| l.period == period && l.needs_elimination)
            .filter(|l| l.reconciliation_status == ReconciliationStatus::Unreconciled)
            .filter(|l| scenario.is_none_or(|s| l.scenario == s))
            .cloned()
            .collect();
        // Date ascending, then amount descending.
        legs.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| b.effective_amount().cmp(&a.effective_amount()))
        });
        Ok(legs)
    }

    fn by_period(
        &self,
        entities: &[EntityId],
        period: Period,
    ) -> RepositoryResult<Vec<IntercompanyTransaction>> {
        Ok(self
            .state()?
            .transactions
            .values()
            .filter(|l| entities.contains(&l.entity) && l.period == period)
            .cloned()
            .collect())
    }

    fn eliminable(
        &self,
        entities: &[EntityId],
        period: Period,
    ) -> RepositoryResult<Vec<IntercompanyTransaction>> {
        let mut legs: Vec<IntercompanyTransaction> = self
            .state()?
            .transactions
            .values()
            .filter(|l| entities.contains(&l.entity) && entities.contains(&l.counterparty))
            .filter(|l| l.period == period && l.needs_elimination)
            .filter(|l| l.elimination_status != EliminationStatus::NotRequired)
            .cloned()
            .collect();
        legs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(legs)
    }

    fn record_match(&self, update: &MatchUpdate) -> RepositoryResult<()> {
        let mut state = self.state()?;
        // Both legs commit or neither: verify existence before mutating.
        for id in [update.seller, update.buyer] {
            if !state.transactions.contains_key(&id) {
                return Err(RepositoryError::NotFound(format!("transaction {id}")));
            }
        }
        for (own, partner) in [(update.seller, update.buyer), (update.buyer, update.seller)] {
            let leg = state
                .transactions
                .get_mut(&own)
                .ok_or_else(|| RepositoryError::NotFound(format!("transaction {own}")))?;
            leg.reconciliation_status = update.status;
            leg.matched_with = Some(partner);
            leg.amount_difference = Some(update.amount_difference);
            leg.date_difference_days = Some(update.date_difference_days);
        }
        Ok(())
    }
}

impl TrialBalanceProvider for MemoryStore {
    fn trial_balance(
        &self,
        entity: EntityId,
        period: Period,
    ) -> RepositoryResult<Vec<TrialBalanceRow>> {
        Ok(self
            .state()?
            .trial_balances
            .get(&(entity, period))
            .cloned()
            .unwrap_or_default())
    }
}

impl AdjustmentRepository for MemoryStore {
    fn replace_generated(
        &self,
        parent: EntityId,
        period: Period,
        adjustments: &[Adjustment],
    ) -> RepositoryResult<()> {
        let mut state = self.state()?;
        state.adjustments.retain(|_, a| {
            !(a.parent_entity == parent
                && a.period == period
                && a.origin == AdjustmentOrigin::Generated)
        });
        for adjustment in adjustments {
            state.adjustments.insert(adjustment.id, adjustment.clone());
        }
        Ok(())
    }

    fn insert(&self, adjustment: &Adjustment) -> RepositoryResult<()> {
        let mut state = self.state()?;
        if state.adjustments.contains_key(&adjustment.id) {
            return Err(RepositoryError::Conflict(format!(
                "adjustment {}",
                adjustment.id
            )));
        }
        state.adjustments.insert(adjustment.id, adjustment.clone());
        Ok(())
    }

    fn get(&self, id: AdjustmentId) -> RepositoryResult<Option<Adjustment>> {
        Ok(self.state()?.adjustments.get(&id).cloned())
    }

    fn for_period(&self, parent: EntityId, period: Period) -> RepositoryResult<Vec<Adjustment>> {
        let mut rows: Vec<Adjustment> = self
            .state()?
            .adjustments
            .values()
            .filter(|a| a.parent_entity == parent && a.period == period)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    fn mark_reversed(&self, id: AdjustmentId, reversal: AdjustmentId) -> RepositoryResult<()> {
        let mut state = self.state()?;
        let row = state
            .adjustments
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("adjustment {id}")))?;
        row.reversed_by = Some(reversal);
        Ok(())
    }

    fn insert_run(&self, run: &ConsolidationRun) -> RepositoryResult<()> {
        self.state()?.runs.push(run.clone());
        Ok(())
    }

    fn runs(&self, parent: EntityId) -> RepositoryResult<Vec<ConsolidationRun>> {
        let mut runs: Vec<ConsolidationRun> = self
            .state()?
            .runs
            .iter()
            .filter(|r| r.parent_entity == parent)
            .cloned()
            .collect();
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(runs)
    }
}
