//! Repository layer for persisting entities to SQLite
//!
//! Each repository is a unit struct of associated functions. Every call
//! takes the connection and the identity map explicitly; pass a
//! transaction (it derefs to `Connection`) to group calls into one commit.
//!
//! ## Logging Ownership
//!
//! Write operations (create/save/update/delete) emit the start/end
//! boundary events. Queries, hydration and DDL use `tracing::debug!()`.

pub mod department_repo;
pub mod employee_repo;
pub mod hydration;
pub mod review_repo;

pub use department_repo::DepartmentRepo;
pub use employee_repo::EmployeeRepo;
pub use review_repo::ReviewRepo;

use crate::errors::Result;
use hrdb_core::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Run a write operation between boundary log events
pub(crate) fn logged<T>(op: &'static str, body: impl FnOnce() -> Result<T>) -> Result<T> {
    log_op_start!(op);
    let start = Instant::now();

    match body() {
        Ok(value) => {
            log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
            Ok(value)
        }
        Err(e) => {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}
