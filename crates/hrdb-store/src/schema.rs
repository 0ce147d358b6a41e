//! Table definitions
//!
//! Every statement is idempotent (`IF NOT EXISTS` / `IF EXISTS`).

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;

pub const CREATE_DEPARTMENTS: &str = "CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    name TEXT,
    location TEXT
)";

pub const CREATE_EMPLOYEES: &str = "CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    job_title TEXT,
    department_id INTEGER REFERENCES departments(id)
)";

pub const CREATE_REVIEWS: &str = "CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY,
    year INTEGER,
    summary TEXT,
    employee_id INTEGER REFERENCES employees(id)
)";

pub const DROP_DEPARTMENTS: &str = "DROP TABLE IF EXISTS departments";
pub const DROP_EMPLOYEES: &str = "DROP TABLE IF EXISTS employees";
pub const DROP_REVIEWS: &str = "DROP TABLE IF EXISTS reviews";

/// Run one DDL statement
pub(crate) fn execute_ddl(conn: &Connection, table: &str, sql: &str) -> Result<()> {
    conn.execute(sql, []).map_err(from_rusqlite)?;
    tracing::debug!(table, "ddl applied");
    Ok(())
}

/// Create all three tables, parents first
pub fn create_all(conn: &Connection) -> Result<()> {
    execute_ddl(conn, "departments", CREATE_DEPARTMENTS)?;
    execute_ddl(conn, "employees", CREATE_EMPLOYEES)?;
    execute_ddl(conn, "reviews", CREATE_REVIEWS)?;
    Ok(())
}

/// Drop all three tables, children first
pub fn drop_all(conn: &Connection) -> Result<()> {
    execute_ddl(conn, "reviews", DROP_REVIEWS)?;
    execute_ddl(conn, "employees", DROP_EMPLOYEES)?;
    execute_ddl(conn, "departments", DROP_DEPARTMENTS)?;
    Ok(())
}
