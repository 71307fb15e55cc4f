// Catalog table row types and queries

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::metadata::VideoMetadata;

const ENTRY_COLUMNS: &str = "id, hash_name, original_filename, file_extension, duration, \
     width, height, codec, bitrate, file_size, created_at";

/// One cataloged file. Rows are never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub hash_name: String,
    pub original_filename: String,
    /// Includes the leading dot (".mp4"), empty when the file has no extension
    pub file_extension: String,
    pub duration: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub codec: Option<String>,
    pub bitrate: Option<i64>,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Name of the copy in the destination folder
    pub fn stored_filename(&self) -> String {
        format!("{}{}", self.hash_name, self.file_extension)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    pub hash_name: String,
    pub original_filename: String,
    pub file_extension: String,
    pub duration: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub codec: Option<String>,
    pub bitrate: Option<i64>,
    pub file_size: i64,
}

impl NewCatalogEntry {
    pub fn new(
        hash_name: &str,
        original_filename: &str,
        file_extension: &str,
        metadata: &VideoMetadata,
    ) -> Self {
        Self {
            hash_name: hash_name.to_string(),
            original_filename: original_filename.to_string(),
            file_extension: file_extension.to_string(),
            duration: metadata.duration,
            width: metadata.width,
            height: metadata.height,
            codec: metadata.codec.clone(),
            bitrate: metadata.bitrate,
            file_size: metadata.file_size,
        }
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        id: row.get(0)?,
        hash_name: row.get(1)?,
        original_filename: row.get(2)?,
        file_extension: row.get(3)?,
        duration: row.get(4)?,
        width: row.get(5)?,
        height: row.get(6)?,
        codec: row.get(7)?,
        bitrate: row.get(8)?,
        file_size: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert a new entry. A UNIQUE violation on hash_name or original_filename
/// is reported as DuplicateEntry.
pub fn insert_entry(conn: &Connection, entry: &NewCatalogEntry) -> Result<i64> {
    let inserted = conn.execute(
        "INSERT INTO video_mapping (
            hash_name, original_filename, file_extension,
            duration, width, height, codec, bitrate, file_size, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            entry.hash_name,
            entry.original_filename,
            entry.file_extension,
            entry.duration,
            entry.width,
            entry.height,
            entry.codec,
            entry.bitrate,
            entry.file_size,
            Utc::now(),
        ],
    );

    match inserted {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(err, msg)) if err.code == ErrorCode::ConstraintViolation => {
            Err(CatalogError::DuplicateEntry(format!(
                "{} as {} ({})",
                entry.original_filename,
                entry.hash_name,
                msg.unwrap_or_else(|| "constraint violation".to_string())
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Look up the hash name recorded for an original filename
pub fn find_hash_by_filename(conn: &Connection, original_filename: &str) -> Result<Option<String>> {
    let result = conn.query_row(
        "SELECT hash_name FROM video_mapping WHERE original_filename = ?1",
        params![original_filename],
        |row| row.get(0),
    ).optional()?;
    Ok(result)
}

pub fn hash_name_exists(conn: &Connection, hash_name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM video_mapping WHERE hash_name = ?1",
        params![hash_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_entry_by_filename(conn: &Connection, original_filename: &str) -> Result<Option<CatalogEntry>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM video_mapping WHERE original_filename = ?1", ENTRY_COLUMNS),
        params![original_filename],
        entry_from_row,
    ).optional()?;
    Ok(result)
}

/// Newest entries first
pub fn list_entries(conn: &Connection, limit: i64) -> Result<Vec<CatalogEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM video_mapping ORDER BY id DESC LIMIT ?1",
        ENTRY_COLUMNS
    ))?;
    let entries = stmt
        .query_map(params![limit], entry_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

pub fn count_entries(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM video_mapping", [], |row| row.get(0))?;
    Ok(count)
}
