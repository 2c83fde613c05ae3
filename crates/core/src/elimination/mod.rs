//! Elimination templates and entry generation.
//!
//! A catalog of rule-based templates describes how each intercompany
//! scenario is eliminated: which accounts to debit and credit, how the
//! amount is derived from the transaction, and when the rule applies.
//! The generator instantiates balanced adjustments from applicable
//! templates.

pub mod catalog;
pub mod error;
pub mod generator;
pub mod template;

pub use catalog::{CatalogStatistics, TemplateCatalog};
pub use error::EliminationError;
pub use generator::generate_entries;
pub use template::{
    AmountField, AmountFormula, Condition, EliminationTemplate, TemplateGroup, TemplateLeg,
};
