// Database module

pub mod migrations;
pub mod schema;
pub mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::{CatalogError, Result};

pub use store::{CatalogStore, SqliteCatalogStore};

/// Outcome of provisioning a catalog database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub db_path: PathBuf,
    /// False if the database file was created by this call
    pub already_existed: bool,
    pub schema_version: u32,
}

/// Create the database file (and its folder) if needed and apply pending
/// migrations. Safe to run any number of times.
pub fn provision(db_path: &Path) -> Result<ProvisionReport> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let already_existed = db_path.exists();
    let conn = Connection::open(db_path)?;
    let schema_version = migrations::run_migrations(&conn)?;

    Ok(ProvisionReport {
        db_path: db_path.to_path_buf(),
        already_existed,
        schema_version,
    })
}

/// Open an existing, provisioned database. Never creates the file.
pub fn open_db(db_path: &Path) -> Result<Connection> {
    if !db_path.is_file() {
        return Err(CatalogError::DatabaseNotInitialized(db_path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(Duration::from_secs(5))?;

    migrations::ensure_current(&conn)?;

    Ok(conn)
}
