//! Entity and ownership domain types.

use chrono::NaiveDate;
use groupclose_shared::types::EntityId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Legal position of an entity in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Group parent (consolidation root candidate).
    Parent,
    /// Directly held subsidiary.
    Subsidiary,
    /// Subsidiary of a subsidiary.
    SubSubsidiary,
    /// Associate (significant influence, not control).
    Associate,
    /// Jointly controlled venture.
    JointVenture,
}

/// Degree of control derived from the direct ownership percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Direct ownership >= 99%.
    WhollyOwned,
    /// Direct ownership >= 50%.
    Controlling,
    /// Anything below 50%.
    MinorityStake,
}

impl ControlType {
    /// Derives the control type from a direct ownership percentage.
    #[must_use]
    pub fn from_ownership(pct: Decimal) -> Self {
        if pct >= Decimal::from(99) {
            Self::WhollyOwned
        } else if pct >= Decimal::from(50) {
            Self::Controlling
        } else {
            Self::MinorityStake
        }
    }
}

/// How an entity's financials enter the consolidated statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationMethod {
    /// Line-by-line full consolidation.
    Full,
    /// Proportional consolidation.
    Proportional,
    /// Equity method (one-line pickup).
    Equity,
    /// Cost method.
    Cost,
}

impl ConsolidationMethod {
    /// Default method for a given effective ownership percentage:
    /// >= 50% full consolidation, 20-49% equity method, below 20% cost.
    #[must_use]
    pub fn from_effective_ownership(pct: Decimal) -> Self {
        if pct >= Decimal::from(50) {
            Self::Full
        } else if pct >= Decimal::from(20) {
            Self::Equity
        } else {
            Self::Cost
        }
    }
}

/// A legal entity in the group structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Entity identifier.
    pub id: EntityId,
    /// Unique entity code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Legal position in the group.
    pub entity_type: EntityType,
    /// Direct parent, `None` for roots.
    pub parent: Option<EntityId>,
    /// Depth in the tree; roots are level 1.
    pub level: u32,
    /// Ancestor chain from the root down to (and including) the parent.
    /// Empty for roots. An entity `d` descends from `a` exactly when
    /// `a` appears in `d`'s path.
    pub path: Vec<EntityId>,
    /// Direct ownership percentage held by the parent, in (0, 100].
    pub ownership_pct: Decimal,
    /// Product of direct ownership percentages along the root path.
    pub effective_ownership: Decimal,
    /// Control classification from the direct percentage.
    pub control_type: ControlType,
    /// Consolidation method, defaulted from effective ownership.
    pub consolidation_method: ConsolidationMethod,
    /// Inactive entities are excluded from every consolidation scope.
    pub is_active: bool,
}

impl Entity {
    /// Whether `ancestor` lies on this entity's root path.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: EntityId) -> bool {
        self.path.contains(&ancestor)
    }
}

/// Detailed audit record behind an ownership edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRelationship {
    /// Owning entity.
    pub parent: EntityId,
    /// Owned entity.
    pub child: EntityId,
    /// Ownership percentage of the edge.
    pub ownership_pct: Decimal,
    /// Voting-rights percentage; defaults to the ownership percentage.
    pub voting_rights_pct: Decimal,
    /// Date the stake was acquired.
    pub investment_date: Option<NaiveDate>,
    /// Consideration paid for the stake.
    pub investment_amount: Option<Decimal>,
}

/// Input for creating an entity.
#[derive(Debug, Clone)]
pub struct NewEntity {
    /// Unique entity code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Legal position in the group.
    pub entity_type: EntityType,
    /// Direct parent, `None` for roots.
    pub parent: Option<EntityId>,
    /// Direct ownership percentage, in (0, 100].
    pub ownership_pct: Decimal,
    /// Voting rights; falls back to `ownership_pct` when `None`.
    pub voting_rights_pct: Option<Decimal>,
    /// Date the stake was acquired.
    pub investment_date: Option<NaiveDate>,
    /// Consideration paid for the stake.
    pub investment_amount: Option<Decimal>,
}

impl NewEntity {
    /// Input for a root entity (no parent, 100% ownership).
    #[must_use]
    pub fn root(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            entity_type: EntityType::Parent,
            parent: None,
            ownership_pct: Decimal::from(100),
            voting_rights_pct: None,
            investment_date: None,
            investment_amount: None,
        }
    }

    /// Input for a subsidiary under `parent` at the given ownership.
    #[must_use]
    pub fn subsidiary(
        code: impl Into<String>,
        name: impl Into<String>,
        parent: EntityId,
        ownership_pct: Decimal,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            entity_type: EntityType::Subsidiary,
            parent: Some(parent),
            ownership_pct,
            voting_rights_pct: None,
            investment_date: None,
            investment_amount: None,
        }
    }
}

/// Mutable entity fields for [`super::HierarchyService::update_entity`].
///
/// Ownership and structure are deliberately absent: moving an entity or
/// changing a percentage invalidates derived levels and effective ownership
/// down the subtree, so those go through delete/recreate.
#[derive(Debug, Clone, Default)]
pub struct EntityUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New legal position.
    pub entity_type: Option<EntityType>,
    /// Consolidation method override.
    pub consolidation_method: Option<ConsolidationMethod>,
    /// Activation flag.
    pub is_active: Option<bool>,
}

/// Filter criteria for consolidation scope resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeCriteria {
    /// Minimum effective ownership percentage, inclusive.
    pub min_ownership: Decimal,
    /// Allowed consolidation methods; `None` means the default of full and
    /// proportional consolidation.
    pub allowed_methods: Option<Vec<ConsolidationMethod>>,
    /// Allowed entity types; `None` means all.
    pub allowed_types: Option<Vec<EntityType>>,
}

impl Default for ScopeCriteria {
    fn default() -> Self {
        Self {
            min_ownership: Decimal::ZERO,
            allowed_methods: None,
            allowed_types: None,
        }
    }
}

impl ScopeCriteria {
    /// Methods admitted by these criteria.
    #[must_use]
    pub fn methods(&self) -> Vec<ConsolidationMethod> {
        self.allowed_methods.clone().unwrap_or_else(|| {
            vec![ConsolidationMethod::Full, ConsolidationMethod::Proportional]
        })
    }
}

/// Aggregate statistics over the stored hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyStatistics {
    /// All entities on record.
    pub total_entities: usize,
    /// Active entities.
    pub active_entities: usize,
    /// Entity count per level, sorted by level.
    pub by_level: Vec<(u32, usize)>,
    /// Entity count per type.
    pub by_type: Vec<(EntityType, usize)>,
    /// Deepest level in use.
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(100), ControlType::WhollyOwned)]
    #[case(dec!(99), ControlType::WhollyOwned)]
    #[case(dec!(75), ControlType::Controlling)]
    #[case(dec!(50), ControlType::Controlling)]
    #[case(dec!(49.9), ControlType::MinorityStake)]
    #[case(dec!(10), ControlType::MinorityStake)]
    fn test_control_type_thresholds(#[case] pct: Decimal, #[case] expected: ControlType) {
        assert_eq!(ControlType::from_ownership(pct), expected);
    }

    #[rstest]
    #[case(dec!(100), ConsolidationMethod::Full)]
    #[case(dec!(50), ConsolidationMethod::Full)]
    #[case(dec!(49.99), ConsolidationMethod::Equity)]
    #[case(dec!(20), ConsolidationMethod::Equity)]
    #[case(dec!(19.99), ConsolidationMethod::Cost)]
    fn test_method_thresholds(#[case] pct: Decimal, #[case] expected: ConsolidationMethod) {
        assert_eq!(ConsolidationMethod::from_effective_ownership(pct), expected);
    }

    #[test]
    fn test_default_scope_methods() {
        let criteria = ScopeCriteria::default();
        assert_eq!(
            criteria.methods(),
            vec![ConsolidationMethod::Full, ConsolidationMethod::Proportional]
        );
        let narrowed = ScopeCriteria {
            allowed_methods: Some(vec![ConsolidationMethod::Equity]),
            ..ScopeCriteria::default()
        };
        assert_eq!(narrowed.methods(), vec![ConsolidationMethod::Equity]);
    }
}
