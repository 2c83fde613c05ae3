//! Collaborator contracts for persistence.
//!
//! The core never talks to a database directly; every mutating phase of a
//! consolidation run goes through one of these traits. Implementations own
//! the unit-of-work boundary: a method either applies its whole effect or
//! fails with a [`RepositoryError`], which the core propagates unchanged.

use groupclose_shared::error::RepositoryResult;
use groupclose_shared::types::{AdjustmentId, EntityId, Period};

use crate::adjustment::Adjustment;
use crate::consolidation::types::{ConsolidationRun, TrialBalanceRow};
use crate::hierarchy::types::{Entity, EntityRelationship};
use crate::reconciliation::types::MatchUpdate;
use crate::transaction::{IntercompanyTransaction, ScenarioType};

/// Entity and ownership-edge records.
pub trait EntityRepository {
    /// Persists a new entity, together with the ownership edge to its parent
    /// when one exists. Both rows commit or neither does.
    fn insert(
        &self,
        entity: &Entity,
        relationship: Option<&EntityRelationship>,
    ) -> RepositoryResult<()>;

    /// Fetches an entity by id.
    fn get(&self, id: EntityId) -> RepositoryResult<Option<Entity>>;

    /// Fetches an entity by its unique code.
    fn by_code(&self, code: &str) -> RepositoryResult<Option<Entity>>;

    /// All entities on record.
    fn all(&self) -> RepositoryResult<Vec<Entity>>;

    /// Overwrites an existing entity record.
    fn update(&self, entity: &Entity) -> RepositoryResult<()>;

    /// Removes the given entities and every ownership edge touching them.
    fn delete(&self, ids: &[EntityId]) -> RepositoryResult<()>;

    /// Ownership edges held by `parent`.
    fn relationships(&self, parent: EntityId) -> RepositoryResult<Vec<EntityRelationship>>;
}

/// Intercompany transaction queries and reconciliation updates.
pub trait TransactionRepository {
    /// Unreconciled, elimination-needed legs recorded by any of `entities`
    /// in `period`, optionally restricted to one scenario. Ordered by date,
    /// then amount descending.
    fn unreconciled(
        &self,
        entities: &[EntityId],
        period: Period,
        scenario: Option<ScenarioType>,
    ) -> RepositoryResult<Vec<IntercompanyTransaction>>;

    /// All legs recorded by any of `entities` in `period`, regardless of
    /// status.
    fn by_period(
        &self,
        entities: &[EntityId],
        period: Period,
    ) -> RepositoryResult<Vec<IntercompanyTransaction>>;

    /// Legs still flagged as needing elimination where both sides of the
    /// transaction are inside `entities`, excluding `NotRequired` ones.
    fn eliminable(
        &self,
        entities: &[EntityId],
        period: Period,
    ) -> RepositoryResult<Vec<IntercompanyTransaction>>;

    /// Applies a match outcome to both legs of a pair: status, partner id,
    /// and computed differences. Both legs commit or neither does.
    fn record_match(&self, update: &MatchUpdate) -> RepositoryResult<()>;
}

/// Per-entity account aggregates from the external ledger.
pub trait TrialBalanceProvider {
    /// Debit and credit totals per account for one entity and period.
    fn trial_balance(
        &self,
        entity: EntityId,
        period: Period,
    ) -> RepositoryResult<Vec<TrialBalanceRow>>;
}

/// Adjustment rows and consolidation run metadata.
pub trait AdjustmentRepository {
    /// Atomically removes all previously generated adjustments for
    /// `(parent, period)` and inserts `adjustments` in their place. Manual
    /// entries and reversals are untouched. Rerunning a consolidation
    /// therefore never double-applies eliminations.
    fn replace_generated(
        &self,
        parent: EntityId,
        period: Period,
        adjustments: &[Adjustment],
    ) -> RepositoryResult<()>;

    /// Inserts a single adjustment (manual entries, reversals).
    fn insert(&self, adjustment: &Adjustment) -> RepositoryResult<()>;

    /// Fetches an adjustment by id.
    fn get(&self, id: AdjustmentId) -> RepositoryResult<Option<Adjustment>>;

    /// All adjustments for `(parent, period)`, generated and manual alike.
    fn for_period(&self, parent: EntityId, period: Period) -> RepositoryResult<Vec<Adjustment>>;

    /// Links `reversal` to the original adjustment's audit trail.
    fn mark_reversed(&self, id: AdjustmentId, reversal: AdjustmentId) -> RepositoryResult<()>;

    /// Persists run metadata. Called last in the pipeline; a run that failed
    /// earlier leaves no row.
    fn insert_run(&self, run: &ConsolidationRun) -> RepositoryResult<()>;

    /// Run history for a consolidation root, newest first.
    fn runs(&self, parent: EntityId) -> RepositoryResult<Vec<ConsolidationRun>>;
}
