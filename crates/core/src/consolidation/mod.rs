//! Consolidation aggregation and the run orchestrator.
//!
//! `aggregator` holds the pure math: trial balance union, adjustment
//! application, minority interest, and class totals. `ConsolidationService`
//! sequences the full pipeline over the repository contracts and persists
//! the run record.

pub mod aggregator;
pub mod error;
pub mod service;
pub mod types;

pub use error::ConsolidationError;
pub use service::ConsolidationService;
pub use types::{
    ClassTotals, ConsolidatedAccount, ConsolidatedReport, ConsolidationRun, MinorityInterest,
    MinorityStake, ReportType, RunStatus, TrialBalanceRow,
};
