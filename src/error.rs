// Video Catalog Error Types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Source folder does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No catalog database at {}. Run 'vidcat init' first.", .0.display())]
    DatabaseNotInitialized(PathBuf),

    #[error("Database schema version {found} does not match this build (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },

    #[error("Already cataloged: {0}")]
    DuplicateEntry(String),

    #[error("FFprobe error: {0}")]
    Probe(String),

    #[error("Copy error: {0}")]
    Copy(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
