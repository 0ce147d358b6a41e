//! Unit of work
//!
//! Runs a batch of repository calls inside one SQLite transaction and keeps
//! the identity map consistent with the outcome: on commit the map keeps
//! every registration made by the batch, on failure the journaled changes
//! are undone so no instance is left holding an id the database never
//! stored.

use crate::errors::{from_rusqlite, Result};
use hrdb_core::identity_map::IdentityMap;
use hrdb_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::time::Instant;

/// Run `work` in a transaction
///
/// # Errors
/// Returns the first error produced by `work`, or a `Persistence` error if
/// the transaction cannot be opened or committed. Either way the database
/// and the identity map are rolled back.
pub fn run<T, F>(conn: &mut Connection, map: &mut IdentityMap, work: F) -> Result<T>
where
    F: FnOnce(&Connection, &mut IdentityMap) -> Result<T>,
{
    log_op_start!("unit_of_work");
    let start = Instant::now();

    let result = run_impl(conn, map, work);

    match &result {
        Ok(_) => log_op_end!(
            "unit_of_work",
            duration_ms = start.elapsed().as_millis() as u64
        ),
        Err(e) => log_op_error!(
            "unit_of_work",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        ),
    }
    result
}

fn run_impl<T, F>(conn: &mut Connection, map: &mut IdentityMap, work: F) -> Result<T>
where
    F: FnOnce(&Connection, &mut IdentityMap) -> Result<T>,
{
    let tx = conn.transaction().map_err(from_rusqlite)?;
    map.begin_unit();

    let value = match work(&tx, map) {
        Ok(value) => value,
        Err(e) => {
            map.rollback_unit();
            if let Err(rollback_err) = tx.rollback() {
                tracing::debug!(error = %rollback_err, "transaction rollback failed");
            }
            return Err(e);
        }
    };

    match tx.commit() {
        Ok(()) => {
            map.commit_unit();
            Ok(value)
        }
        Err(e) => {
            map.rollback_unit();
            Err(from_rusqlite(e))
        }
    }
}
