// Video Catalog - Library Entry Point

pub mod constants;
pub mod config;
pub mod error;
pub mod tools;
pub mod db;
pub mod hash;
pub mod metadata;
pub mod ingest;
pub mod reconcile;

pub use config::CatalogConfig;
pub use db::{CatalogStore, SqliteCatalogStore};
pub use error::{CatalogError, Result};
pub use ingest::{run_ingest, run_ingest_with_progress, FileOutcome, IngestResult};
pub use metadata::{FfprobeProber, MetadataProber, VideoMetadata};
