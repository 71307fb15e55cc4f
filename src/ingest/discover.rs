// Source folder listing for ingest

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::{CatalogError, Result};

/// A regular file found directly inside the source folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name as it appears in the folder; the dedup key
    pub filename: String,
    pub path: PathBuf,
}

/// List the regular files directly inside `source_dir`.
///
/// Subdirectories are skipped silently. FIFOs, sockets and device nodes are
/// skipped with a warning since copying them can block. Symlinks are
/// followed. Order follows the filesystem and is not sorted. Names that are not valid
/// UTF-8 are skipped with a warning since they cannot be stored as catalog keys.
pub fn discover_source_files(source_dir: &Path) -> Result<Vec<SourceFile>> {
    if !source_dir.is_dir() {
        return Err(CatalogError::SourceNotFound(source_dir.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {}", source_dir.display(), e);
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            log::warn!("Skipping special file: {}", entry.path().display());
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => files.push(SourceFile {
                filename: name.to_string(),
                path: entry.path().to_path_buf(),
            }),
            None => {
                log::warn!("Skipping non UTF-8 filename: {}", entry.path().display());
            }
        }
    }

    Ok(files)
}
