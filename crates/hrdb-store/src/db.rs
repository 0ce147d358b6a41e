//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection-level pragmas
///
/// Foreign-key enforcement is off unless asked for: referential integrity
/// is checked by the entity setters, not by the engine.
pub fn configure(conn: &Connection, foreign_keys: bool, wal: bool) -> Result<()> {
    let fk = if foreign_keys { "ON" } else { "OFF" };
    conn.execute(&format!("PRAGMA foreign_keys = {}", fk), [])
        .map_err(from_rusqlite)?;

    if wal {
        // journal_mode answers with the mode actually in effect
        let mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(from_rusqlite)?;
        tracing::debug!(journal_mode = %mode, "journal mode set");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreign_keys(conn: &Connection) -> i64 {
        conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_configure_toggles_foreign_keys() {
        let conn = open_in_memory().unwrap();
        configure(&conn, true, false).unwrap();
        assert_eq!(foreign_keys(&conn), 1);
        configure(&conn, false, false).unwrap();
        assert_eq!(foreign_keys(&conn), 0);
    }
}
