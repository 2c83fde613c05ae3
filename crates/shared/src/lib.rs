//! Shared types, errors, and configuration for Groupclose.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Fiscal period labels
//! - Account classification by code
//! - Engine configuration (matching tolerances, score weights, tax rate)
//! - Repository-level error types

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{RepositoryError, RepositoryResult};
