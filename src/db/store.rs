//! Catalog store abstraction.
//!
//! The ingest pipeline talks to the catalog only through [`CatalogStore`], so
//! tests can run it against an in-memory SQLite database.

use std::path::Path;

use rusqlite::Connection;

use super::schema::{self, CatalogEntry, NewCatalogEntry};
use crate::error::Result;

pub trait CatalogStore {
    /// Returns the hash name recorded for `original_filename`, if any.
    /// Reflects every insert committed before the call.
    fn exists_by_filename(&self, original_filename: &str) -> Result<Option<String>>;

    /// Returns true if a row already uses `hash_name`.
    fn exists_by_hash(&self, hash_name: &str) -> Result<bool>;

    /// Inserts one entry in its own transaction.
    /// On failure the transaction is rolled back and nothing is written.
    fn insert(&self, entry: &NewCatalogEntry) -> Result<i64>;

    /// Returns up to `limit` entries, newest first.
    fn list(&self, limit: i64) -> Result<Vec<CatalogEntry>>;

    fn count(&self) -> Result<i64>;
}

/// SQLite-backed catalog store
pub struct SqliteCatalogStore {
    conn: Connection,
}

impl SqliteCatalogStore {
    /// Open a provisioned catalog database
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self {
            conn: super::open_db(db_path)?,
        })
    }

    /// Fresh in-memory catalog with the schema applied
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn exists_by_filename(&self, original_filename: &str) -> Result<Option<String>> {
        schema::find_hash_by_filename(&self.conn, original_filename)
    }

    fn exists_by_hash(&self, hash_name: &str) -> Result<bool> {
        schema::hash_name_exists(&self.conn, hash_name)
    }

    fn insert(&self, entry: &NewCatalogEntry) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        match schema::insert_entry(&tx, entry) {
            Ok(id) => {
                tx.commit()?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    log::error!("Rollback failed for {}: {}", entry.original_filename, rollback_err);
                }
                Err(e)
            }
        }
    }

    fn list(&self, limit: i64) -> Result<Vec<CatalogEntry>> {
        schema::list_entries(&self.conn, limit)
    }

    fn count(&self) -> Result<i64> {
        schema::count_entries(&self.conn)
    }
}
