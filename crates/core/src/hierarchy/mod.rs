//! Entity hierarchy and ownership management.
//!
//! This module implements the group structure side of consolidation:
//! - Entity and ownership-edge records
//! - Level, hierarchy path, and effective-ownership math
//! - Default consolidation method and control type derivation
//! - Consolidation scope resolution

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::HierarchyError;
pub use service::HierarchyService;
pub use types::{
    ConsolidationMethod, ControlType, Entity, EntityRelationship, EntityType, EntityUpdate,
    HierarchyStatistics, NewEntity, ScopeCriteria,
};
