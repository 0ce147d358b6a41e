//! hrdb Store - SQLite persistence for the hrdb entities
//!
//! Provides:
//! - Table DDL for departments, employees and reviews
//! - Repositories that keep query results in the identity map
//! - Table-backed foreign-key lookups
//! - A unit of work wrapping repository calls in one transaction
//! - TOML configuration for the connection and logging

pub mod config;
pub mod db;
pub mod errors;
pub mod lookup;
pub mod repo;
pub mod schema;
pub mod unit_of_work;

// Re-export key types
pub use config::StoreConfig;
pub use errors::Result;
pub use lookup::TableLookup;
pub use repo::{DepartmentRepo, EmployeeRepo, ReviewRepo};
