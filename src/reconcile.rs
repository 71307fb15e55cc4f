// Orphan report for the destination folder
//
// Copies whose catalog insert failed (or whose run was interrupted) stay on
// disk without a row. This only reports them; nothing is deleted.

use std::path::{Path, PathBuf};

use crate::db::CatalogStore;
use crate::error::Result;
use crate::ingest::copy::split_extension;
use crate::ingest::discover::discover_source_files;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanFile {
    pub path: PathBuf,
    /// File stem, which would be the hash name if this were a catalog copy
    pub stem: String,
}

/// Files in `dest_dir` whose stem is not a cataloged hash name.
/// A missing destination folder has no orphans.
pub fn find_orphans(dest_dir: &Path, store: &dyn CatalogStore) -> Result<Vec<OrphanFile>> {
    if !dest_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut orphans = Vec::new();
    for file in discover_source_files(dest_dir)? {
        let (stem, _) = split_extension(&file.filename);
        if !store.exists_by_hash(stem)? {
            orphans.push(OrphanFile {
                path: file.path,
                stem: stem.to_string(),
            });
        }
    }

    orphans.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(orphans)
}
