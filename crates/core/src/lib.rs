//! Core consolidation logic for Groupclose.
//!
//! This crate contains pure business logic with ZERO storage dependencies.
//! All domain types, consolidation rules, and calculations live here; the
//! collaborator contracts in [`repository`] are the only seam to persistence.
//!
//! # Modules
//!
//! - `hierarchy` - Entity hierarchy, ownership math, consolidation scope
//! - `transaction` - Intercompany transaction domain types
//! - `reconciliation` - Transaction matching and tolerance handling
//! - `elimination` - Elimination template catalog and entry generation
//! - `adjustment` - Consolidation adjustments and reversals
//! - `consolidation` - Trial balance aggregation and the report pipeline

pub mod adjustment;
pub mod consolidation;
pub mod elimination;
pub mod hierarchy;
pub mod reconciliation;
pub mod repository;
pub mod transaction;
