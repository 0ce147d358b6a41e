//! Table-backed existence lookups
//!
//! These are the [`ExistsById`] capabilities the repositories inject into
//! entity constructors and foreign-key setters. They query the table
//! directly and never touch the identity map.

use crate::errors::{from_rusqlite, Result};
use hrdb_core::ExistsById;
use rusqlite::Connection;

/// Answers `exists_by_id` with a primary-key lookup against one table
#[derive(Debug, Clone, Copy)]
pub struct TableLookup<'c> {
    conn: &'c Connection,
    table: &'static str,
}

impl<'c> TableLookup<'c> {
    pub fn departments(conn: &'c Connection) -> Self {
        Self {
            conn,
            table: "departments",
        }
    }

    pub fn employees(conn: &'c Connection) -> Self {
        Self {
            conn,
            table: "employees",
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }
}

impl ExistsById for TableLookup<'_> {
    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", self.table);
        let exists: bool = self
            .conn
            .query_row(&sql, [id], |row| row.get(0))
            .map_err(from_rusqlite)?;
        tracing::debug!(table = self.table, entity_id = id, exists, "existence check");
        Ok(exists)
    }
}
