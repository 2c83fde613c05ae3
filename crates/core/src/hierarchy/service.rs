//! Hierarchy service: entity creation, ownership math, scope resolution.

use groupclose_shared::types::EntityId;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::repository::EntityRepository;

use super::error::HierarchyError;
use super::types::{
    ConsolidationMethod, ControlType, Entity, EntityRelationship, EntityType, EntityUpdate,
    HierarchyStatistics, NewEntity, ScopeCriteria,
};

/// Service over [`EntityRepository`] implementing hierarchy operations.
///
/// All derived fields (level, path, effective ownership, control type,
/// default consolidation method) are computed here at creation time; the
/// repository stores them verbatim.
pub struct HierarchyService<'a> {
    entities: &'a dyn EntityRepository,
}

impl<'a> HierarchyService<'a> {
    /// Creates a service over the given repository.
    pub fn new(entities: &'a dyn EntityRepository) -> Self {
        Self { entities }
    }

    /// Creates an entity, deriving its position in the hierarchy.
    ///
    /// For non-roots, level is the parent's level plus one, the path is the
    /// parent's path extended by the parent id, and effective ownership is
    /// the parent's effective ownership times the direct percentage. A
    /// relationship row is persisted alongside the entity.
    ///
    /// # Errors
    ///
    /// `InvalidOwnership` when the percentage is outside (0, 100],
    /// `DuplicateCode` when the code is taken, `ParentNotFound` when the
    /// referenced parent does not exist.
    pub fn create_entity(&self, input: NewEntity) -> Result<Entity, HierarchyError> {
        if input.ownership_pct <= Decimal::ZERO || input.ownership_pct > Decimal::from(100) {
            return Err(HierarchyError::InvalidOwnership(input.ownership_pct));
        }

        if self.entities.by_code(&input.code)?.is_some() {
            return Err(HierarchyError::DuplicateCode(input.code));
        }

        let (level, path, effective_ownership) = match input.parent {
            None => (1, Vec::new(), input.ownership_pct),
            Some(parent_id) => {
                let parent = self
                    .entities
                    .get(parent_id)?
                    .ok_or(HierarchyError::ParentNotFound(parent_id))?;
                let mut path = parent.path;
                path.push(parent_id);
                let effective =
                    parent.effective_ownership * input.ownership_pct / Decimal::from(100);
                (parent.level + 1, path, effective)
            }
        };

        let entity = Entity {
            id: EntityId::new(),
            code: input.code,
            name: input.name,
            entity_type: input.entity_type,
            parent: input.parent,
            level,
            path,
            ownership_pct: input.ownership_pct,
            effective_ownership,
            control_type: ControlType::from_ownership(input.ownership_pct),
            consolidation_method: ConsolidationMethod::from_effective_ownership(
                effective_ownership,
            ),
            is_active: true,
        };

        let relationship = input.parent.map(|parent_id| EntityRelationship {
            parent: parent_id,
            child: entity.id,
            ownership_pct: input.ownership_pct,
            voting_rights_pct: input.voting_rights_pct.unwrap_or(input.ownership_pct),
            investment_date: input.investment_date,
            investment_amount: input.investment_amount,
        });

        self.entities.insert(&entity, relationship.as_ref())?;

        info!(
            entity = %entity.id,
            code = %entity.code,
            level = entity.level,
            effective = %entity.effective_ownership,
            "created entity"
        );
        Ok(entity)
    }

    /// Convenience wrapper: creates `data` as a subsidiary of `parent` at
    /// the given ownership percentage.
    pub fn add_subsidiary(
        &self,
        parent: EntityId,
        mut data: NewEntity,
        ownership_pct: Decimal,
    ) -> Result<Entity, HierarchyError> {
        data.parent = Some(parent);
        data.ownership_pct = ownership_pct;
        self.create_entity(data)
    }

    /// Fetches an entity, failing when it does not exist.
    pub fn entity(&self, id: EntityId) -> Result<Entity, HierarchyError> {
        self.entities
            .get(id)?
            .ok_or(HierarchyError::EntityNotFound(id))
    }

    /// The subtree rooted at `root` (root included), ordered by level then
    /// code. `max_depth` bounds how many levels below the root to include.
    pub fn hierarchy(
        &self,
        root: EntityId,
        max_depth: Option<u32>,
    ) -> Result<Vec<Entity>, HierarchyError> {
        let root_entity = self.entity(root)?;
        let mut members: Vec<Entity> = self
            .entities
            .all()?
            .into_iter()
            .filter(|e| e.id == root || e.is_descendant_of(root))
            .filter(|e| max_depth.is_none_or(|depth| e.level <= root_entity.level + depth))
            .collect();
        members.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.code.cmp(&b.code)));
        Ok(members)
    }

    /// Direct children of an entity, ordered by code.
    pub fn direct_children(&self, parent: EntityId) -> Result<Vec<Entity>, HierarchyError> {
        let mut children: Vec<Entity> = self
            .entities
            .all()?
            .into_iter()
            .filter(|e| e.parent == Some(parent))
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(children)
    }

    /// Resolves the set of entities to consolidate under `root`.
    ///
    /// Keeps active subtree members whose effective ownership meets the
    /// minimum, whose consolidation method is admitted, and whose type is
    /// admitted when types are restricted.
    ///
    /// # Errors
    ///
    /// `ScopeEmpty` when no entity qualifies.
    pub fn consolidation_scope(
        &self,
        root: EntityId,
        criteria: &ScopeCriteria,
    ) -> Result<Vec<Entity>, HierarchyError> {
        let methods = criteria.methods();
        let scope: Vec<Entity> = self
            .hierarchy(root, None)?
            .into_iter()
            .filter(|e| e.is_active)
            .filter(|e| e.effective_ownership >= criteria.min_ownership)
            .filter(|e| methods.contains(&e.consolidation_method))
            .filter(|e| {
                criteria
                    .allowed_types
                    .as_ref()
                    .is_none_or(|types| types.contains(&e.entity_type))
            })
            .collect();

        if scope.is_empty() {
            return Err(HierarchyError::ScopeEmpty { root });
        }

        info!(root = %root, entities = scope.len(), "resolved consolidation scope");
        Ok(scope)
    }

    /// Effective ownership of `target` as seen from `root`, in percent.
    ///
    /// Walks from the target up through its parents multiplying direct
    /// percentages. Returns 100 for the root itself and 0 when no ancestor
    /// path connects the two.
    pub fn effective_ownership(
        &self,
        root: EntityId,
        target: EntityId,
    ) -> Result<Decimal, HierarchyError> {
        if root == target {
            return Ok(Decimal::from(100));
        }

        let mut current = self.entity(target)?;
        let mut effective = Decimal::from(100);
        loop {
            effective = effective * current.ownership_pct / Decimal::from(100);
            match current.parent {
                Some(parent_id) if parent_id == root => return Ok(effective),
                Some(parent_id) => current = self.entity(parent_id)?,
                None => return Ok(Decimal::ZERO),
            }
        }
    }

    /// Applies the given field updates to an entity.
    pub fn update_entity(
        &self,
        id: EntityId,
        update: EntityUpdate,
    ) -> Result<Entity, HierarchyError> {
        let mut entity = self.entity(id)?;
        if let Some(name) = update.name {
            entity.name = name;
        }
        if let Some(entity_type) = update.entity_type {
            entity.entity_type = entity_type;
        }
        if let Some(method) = update.consolidation_method {
            entity.consolidation_method = method;
        }
        if let Some(is_active) = update.is_active {
            entity.is_active = is_active;
        }
        self.entities.update(&entity)?;
        debug!(entity = %id, "updated entity");
        Ok(entity)
    }

    /// Deletes an entity, returning how many records were removed.
    ///
    /// Without `cascade` the entity must be a leaf; with it the whole
    /// subtree goes, relationships included.
    pub fn delete_entity(&self, id: EntityId, cascade: bool) -> Result<usize, HierarchyError> {
        let children = self.direct_children(id)?;
        if !children.is_empty() && !cascade {
            return Err(HierarchyError::HasChildren {
                entity: id,
                child_count: children.len(),
            });
        }

        let ids: Vec<EntityId> = self.hierarchy(id, None)?.iter().map(|e| e.id).collect();
        self.entities.delete(&ids)?;
        info!(entity = %id, removed = ids.len(), cascade, "deleted entity");
        Ok(ids.len())
    }

    /// Entity names along the path from the root down to `id`, inclusive.
    pub fn path_names(&self, id: EntityId) -> Result<Vec<String>, HierarchyError> {
        let entity = self.entity(id)?;
        let mut names = Vec::with_capacity(entity.path.len() + 1);
        for ancestor in &entity.path {
            names.push(self.entity(*ancestor)?.name);
        }
        names.push(entity.name);
        Ok(names)
    }

    /// Aggregate statistics over all stored entities.
    pub fn statistics(&self) -> Result<HierarchyStatistics, HierarchyError> {
        let entities = self.entities.all()?;

        let mut by_level: Vec<(u32, usize)> = Vec::new();
        for entity in &entities {
            match by_level.iter_mut().find(|(level, _)| *level == entity.level) {
                Some((_, count)) => *count += 1,
                None => by_level.push((entity.level, 1)),
            }
        }
        by_level.sort_by_key(|(level, _)| *level);

        let all_types = [
            EntityType::Parent,
            EntityType::Subsidiary,
            EntityType::SubSubsidiary,
            EntityType::Associate,
            EntityType::JointVenture,
        ];
        let by_type: Vec<(EntityType, usize)> = all_types
            .into_iter()
            .map(|t| (t, entities.iter().filter(|e| e.entity_type == t).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        Ok(HierarchyStatistics {
            total_entities: entities.len(),
            active_entities: entities.iter().filter(|e| e.is_active).count(),
            max_depth: entities.iter().map(|e| e.level).max().unwrap_or(0),
            by_level,
            by_type,
        })
    }
}
