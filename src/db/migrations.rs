// Database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use rusqlite::Connection;

use crate::error::{CatalogError, Result};

/// All migrations in order. Each migration is a SQL string.
const MIGRATIONS: &[&str] = &[
    // Migration 1: catalog table with metadata columns
    r#"
    CREATE TABLE video_mapping (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        hash_name TEXT NOT NULL UNIQUE,
        original_filename TEXT NOT NULL UNIQUE,
        file_extension TEXT NOT NULL,
        duration INTEGER,
        width INTEGER,
        height INTEGER,
        codec TEXT,
        bitrate INTEGER,
        file_size INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_hash_name ON video_mapping(hash_name);
    CREATE INDEX idx_original_filename ON video_mapping(original_filename);
    "#,
];

/// Schema version this build writes
pub fn target_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Get current schema version from database
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row(
        "PRAGMA user_version",
        [],
        |row| row.get(0)
    )?;
    Ok(version)
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version = get_schema_version(conn)?;
    let target_version = target_version();

    // Refuse to touch a DB created by a newer build
    if current_version > target_version {
        return Err(CatalogError::SchemaMismatch {
            found: current_version,
            expected: target_version,
        });
    }

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration)?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration_version))?;
        tx.commit()?;

        log::info!("Applied migration {}", migration_version);
    }

    Ok(target_version)
}

/// Fail unless the schema is exactly the one this build writes
pub fn ensure_current(conn: &Connection) -> Result<()> {
    let found = get_schema_version(conn)?;
    let expected = target_version();
    if found != expected {
        return Err(CatalogError::SchemaMismatch { found, expected });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
        assert!(ensure_current(&conn).is_err());

        assert_eq!(run_migrations(&conn).unwrap(), target_version());
        assert_eq!(get_schema_version(&conn).unwrap(), target_version());
        ensure_current(&conn).unwrap();

        // Second run is a no-op
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), target_version());
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 999").unwrap();

        match run_migrations(&conn) {
            Err(CatalogError::SchemaMismatch { found, expected }) => {
                assert_eq!(found, 999);
                assert_eq!(expected, target_version());
            }
            other => panic!("expected schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_table_is_not_adopted() {
        // Older minimal layout without metadata columns or filename uniqueness
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE video_mapping (
                id INTEGER PRIMARY KEY,
                hash_name TEXT NOT NULL UNIQUE,
                original_filename TEXT NOT NULL,
                file_extension TEXT NOT NULL
            );",
        )
        .unwrap();

        assert!(run_migrations(&conn).is_err());
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_indexes_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'video_mapping'")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert!(names.iter().any(|n| n == "idx_hash_name"));
        assert!(names.iter().any(|n| n == "idx_original_filename"));
    }
}
