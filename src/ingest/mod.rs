// Ingest pipeline module
//
// One pass over the source folder: dedup by original filename, hash, copy
// under the hashed name, probe the copy, insert a catalog row. Files are
// processed strictly one after another.

pub mod discover;
pub mod copy;

use std::fmt;
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::db::schema::NewCatalogEntry;
use crate::db::CatalogStore;
use crate::error::{CatalogError, Result};
use crate::hash::generate_hash_name;
use crate::metadata::{MetadataProber, VideoMetadata};
use discover::SourceFile;

/// Step at which a file's ingest stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    Lookup,
    Hash,
    Copy,
    Probe,
    Insert,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IngestStage::Lookup => "lookup",
            IngestStage::Hash => "hash",
            IngestStage::Copy => "copy",
            IngestStage::Probe => "probe",
            IngestStage::Insert => "insert",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Added {
        filename: String,
        hash_name: String,
        stored_filename: String,
        metadata: VideoMetadata,
    },
    Skipped {
        filename: String,
        existing_hash: String,
    },
    Failed {
        filename: String,
        stage: IngestStage,
        error: String,
    },
}

impl FileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            FileOutcome::Added { filename, .. }
            | FileOutcome::Skipped { filename, .. }
            | FileOutcome::Failed { filename, .. } => filename,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestResult {
    pub total_files: usize,
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl IngestResult {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Added { .. } => self.added += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Run the ingest pipeline once over `config.source_dir`
pub fn run_ingest(
    config: &CatalogConfig,
    store: &dyn CatalogStore,
    prober: &dyn MetadataProber,
) -> Result<IngestResult> {
    run_ingest_with_progress(config, store, prober, &mut |_: &FileOutcome| {})
}

/// Run the ingest pipeline, reporting each file's outcome as soon as it is known.
///
/// Only configuration problems (missing source folder, destination folder
/// that cannot be created or listed) fail the run. Per-file problems are
/// recorded as `FileOutcome::Failed` and the run moves on.
pub fn run_ingest_with_progress(
    config: &CatalogConfig,
    store: &dyn CatalogStore,
    prober: &dyn MetadataProber,
    on_file: &mut dyn FnMut(&FileOutcome),
) -> Result<IngestResult> {
    if !config.source_dir.is_dir() {
        return Err(CatalogError::SourceNotFound(config.source_dir.clone()));
    }

    copy::ensure_dest_dir(&config.dest_dir)?;

    let files = discover::discover_source_files(&config.source_dir)?;
    log::info!(
        "Scanning {} ({} entries) into {}",
        config.source_dir.display(),
        files.len(),
        config.dest_dir.display()
    );

    let mut result = IngestResult {
        total_files: files.len(),
        ..Default::default()
    };

    for file in &files {
        let outcome = process_single_file(file, &config.dest_dir, store, prober);
        on_file(&outcome);
        result.record(outcome);
    }

    log::info!(
        "Ingest finished: {} added, {} skipped, {} failed",
        result.added,
        result.skipped,
        result.failed
    );

    Ok(result)
}

/// Take one file through lookup, hash, copy, probe and insert
fn process_single_file(
    file: &SourceFile,
    dest_dir: &Path,
    store: &dyn CatalogStore,
    prober: &dyn MetadataProber,
) -> FileOutcome {
    let failed = |stage: IngestStage, e: CatalogError| {
        log::error!("Failed to ingest {} at {} step: {}", file.filename, stage, e);
        FileOutcome::Failed {
            filename: file.filename.clone(),
            stage,
            error: e.to_string(),
        }
    };

    // Dedup gate: exact original filename only
    match store.exists_by_filename(&file.filename) {
        Ok(Some(existing_hash)) => {
            log::debug!("Skipping {} (already cataloged as {})", file.filename, existing_hash);
            return FileOutcome::Skipped {
                filename: file.filename.clone(),
                existing_hash,
            };
        }
        Ok(None) => {}
        Err(e) => return failed(IngestStage::Lookup, e),
    }

    let (_, extension) = copy::split_extension(&file.filename);

    let hash_name = match generate_hash_name(&file.filename, &file.path) {
        Ok(h) => h,
        Err(e) => return failed(IngestStage::Hash, e),
    };
    let stored_filename = copy::stored_filename(&hash_name, extension);

    let dest_path = match copy::copy_to_destination(&file.path, dest_dir, &stored_filename) {
        Ok(p) => p,
        Err(e) => return failed(IngestStage::Copy, e),
    };
    log::debug!("Copied {} to {}", file.path.display(), dest_path.display());

    // Probe the copy, not the original
    let metadata = match prober.probe(&dest_path) {
        Ok(m) => m,
        Err(e) => return failed(IngestStage::Probe, e),
    };

    let entry = NewCatalogEntry::new(&hash_name, &file.filename, extension, &metadata);
    if let Err(e) = store.insert(&entry) {
        // The copy stays on disk; see `vidcat orphans`
        return failed(IngestStage::Insert, e);
    }

    log::debug!("Added {} as {}", file.filename, stored_filename);

    FileOutcome::Added {
        filename: file.filename.clone(),
        hash_name,
        stored_filename,
        metadata,
    }
}
