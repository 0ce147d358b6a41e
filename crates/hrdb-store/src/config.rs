//! Store configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [database]
//! path = "hr.db"          # omitted => in-memory database
//! foreign_keys = false
//! wal = false
//!
//! [logging]
//! profile = "development" # development | production | test
//! ```
//!
//! Every key is optional.

use crate::db;
use crate::errors::{config_error, io_error, Result};
use hrdb_core::logging_facility::{self, Profile};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file; `None` opens an in-memory database
    pub path: Option<PathBuf>,
    /// Turn on `PRAGMA foreign_keys`
    pub foreign_keys: bool,
    /// Switch file databases to WAL journaling
    pub wal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

impl StoreConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    /// * `Config` - If the TOML is malformed or names an unknown key
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| config_error(e.to_string()))
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    /// * `Io` - If the file cannot be read
    /// * `Config` - If its contents do not parse
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source =
            std::fs::read_to_string(path.as_ref()).map_err(|e| io_error("config_load", e))?;
        Self::from_toml_str(&source)
    }

    /// Open and configure the connection this configuration describes
    ///
    /// # Errors
    /// * `Persistence` - If SQLite cannot open or configure the database
    pub fn open(&self) -> Result<Connection> {
        let conn = match &self.database.path {
            Some(path) => db::open(path)?,
            None => db::open_in_memory()?,
        };
        let wal = self.database.wal && self.database.path.is_some();
        db::configure(&conn, self.database.foreign_keys, wal)?;

        tracing::debug!(
            path = ?self.database.path,
            foreign_keys = self.database.foreign_keys,
            wal,
            "database opened"
        );
        Ok(conn)
    }

    /// Initialise logging with the configured profile
    pub fn init_logging(&self) {
        logging_facility::init(self.logging.profile);
    }
}
