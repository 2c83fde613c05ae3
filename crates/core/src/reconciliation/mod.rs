//! Intercompany transaction reconciliation.
//!
//! Pairs unreconciled transaction legs between in-scope entities, scores
//! candidate pairs, and classifies each accepted pair by the size of its
//! amount difference.

pub mod error;
pub mod matcher;
pub mod service;
pub mod types;

#[cfg(test)]
mod matcher_props;

pub use error::ReconciliationError;
pub use matcher::Matcher;
pub use service::ReconciliationService;
pub use types::{MatchUpdate, ReconciliationOverview, ReconciliationSummary};
