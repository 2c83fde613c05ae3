//! Shared domain primitives.

pub mod account;
pub mod id;
pub mod period;

pub use account::AccountClass;
pub use id::{AdjustmentId, EntityId, RunId, TransactionId};
pub use period::Period;
