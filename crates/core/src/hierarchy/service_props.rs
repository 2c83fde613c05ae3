//! Property-based tests for the hierarchy service.
//!
//! - Ownership percentages always land in (0, 100].
//! - Effective ownership equals the product of direct percentages along the
//!   root path.
//! - Consolidation scope is always a subset of the root's descendant closure.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::tests::FakeEntities;
use super::service::HierarchyService;
use super::types::{NewEntity, ScopeCriteria};
use groupclose_shared::types::EntityId;

/// Strategy for a direct ownership percentage in (0, 100], two decimals.
fn ownership_pct() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000i64).prop_map(|basis_points| Decimal::new(basis_points, 2))
}

/// Strategy for a tree shape: each node names the index of its parent among
/// the previously created nodes, plus its ownership percentage. Depth stays
/// at or below 6 because each parent index points strictly backwards and the
/// node count is bounded.
fn tree_shape() -> impl Strategy<Value = Vec<(usize, Decimal)>> {
    prop::collection::vec((0usize..32, ownership_pct()), 1..20)
}

proptest! {
    #[test]
    fn prop_effective_ownership_is_chain_product(shape in tree_shape()) {
        let repo = FakeEntities::default();
        let service = HierarchyService::new(&repo);
        let root = service
            .create_entity(NewEntity::root("ROOT", "Root"))
            .unwrap();

        let mut created: Vec<EntityId> = vec![root.id];
        let mut direct: Vec<Decimal> = vec![Decimal::from(100)];
        let mut parent_of: Vec<usize> = vec![0];

        for (i, (parent_hint, pct)) in shape.iter().enumerate() {
            let mut parent_index = parent_hint % created.len();
            // Cap the tree at depth 6; reparent overly deep nodes to the root.
            if service.entity(created[parent_index]).unwrap().level >= 6 {
                parent_index = 0;
            }
            let entity = service
                .create_entity(NewEntity::subsidiary(
                    format!("E{i}"),
                    format!("Entity {i}"),
                    created[parent_index],
                    *pct,
                ))
                .unwrap();
            created.push(entity.id);
            direct.push(*pct);
            parent_of.push(parent_index);
        }

        for (index, id) in created.iter().enumerate() {
            let entity = service.entity(*id).unwrap();

            prop_assert!(entity.ownership_pct > Decimal::ZERO);
            prop_assert!(entity.ownership_pct <= Decimal::from(100));

            // Multiply direct percentages walking up to the root.
            let mut expected = Decimal::from(100);
            let mut cursor = index;
            while cursor != 0 {
                expected = expected * direct[cursor] / Decimal::from(100);
                cursor = parent_of[cursor];
            }
            prop_assert_eq!(entity.effective_ownership, expected);

            // And the walking variant agrees with the stored value.
            let walked = service.effective_ownership(root.id, *id).unwrap();
            prop_assert_eq!(walked, expected);
        }
    }

    #[test]
    fn prop_scope_is_subset_of_descendant_closure(shape in tree_shape()) {
        let repo = FakeEntities::default();
        let service = HierarchyService::new(&repo);
        let root = service
            .create_entity(NewEntity::root("ROOT", "Root"))
            .unwrap();
        // A second tree that must never leak into the first root's scope.
        let other = service
            .create_entity(NewEntity::root("OTHER", "Other"))
            .unwrap();

        let mut created: Vec<EntityId> = vec![root.id];
        for (i, (parent_hint, pct)) in shape.iter().enumerate() {
            let parent_index = parent_hint % created.len();
            let entity = service
                .create_entity(NewEntity::subsidiary(
                    format!("E{i}"),
                    format!("Entity {i}"),
                    created[parent_index],
                    *pct,
                ))
                .unwrap();
            created.push(entity.id);
        }

        if let Ok(scope) = service.consolidation_scope(root.id, &ScopeCriteria::default()) {
            for entity in &scope {
                prop_assert!(created.contains(&entity.id));
                prop_assert!(entity.id != other.id);
            }
        }
    }
}
