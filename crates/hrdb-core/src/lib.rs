//! hrdb Core - entity models and the identity map
//!
//! This crate provides the in-memory side of hrdb:
//! - Department, Employee and Review models with validating setters
//! - The `ExistsById` capability used for foreign-key checks
//! - The identity map and its row hydration protocol
//! - Structured error and logging facilities shared with the store crate

pub mod errors;
pub mod identity_map;
pub mod logging_facility;
pub mod lookup;
pub mod model;
pub mod rules;

/// Re-exported so the logging macros resolve schema constants from any crate
pub use hrdb_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ExResult, HrError, Result};
pub use identity_map::{share, Cached, EntityCache, IdentityMap, Shared};
pub use lookup::ExistsById;
pub use model::{Department, Employee, Entity, Review};
