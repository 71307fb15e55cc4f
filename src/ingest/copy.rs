// File copy operations for ingest

use std::fs;
use std::path::{Path, PathBuf};
use filetime::FileTime;
use crate::error::{CatalogError, Result};

/// Split a filename into (stem, extension). The extension keeps its leading
/// dot and is empty when there is none. Leading dots do not start an
/// extension, so ".hidden" has no extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let leading = filename.len() - filename.trim_start_matches('.').len();

    match filename[leading..].rfind('.') {
        Some(idx) => filename.split_at(leading + idx),
        None => (filename, ""),
    }
}

/// Name of the catalog copy: `<hash><extension>`
pub fn stored_filename(hash_name: &str, extension: &str) -> String {
    format!("{}{}", hash_name, extension)
}

/// Create the destination folder if it does not exist yet
pub fn ensure_dest_dir(dest_dir: &Path) -> Result<()> {
    fs::create_dir_all(dest_dir).map_err(|e| {
        CatalogError::Copy(format!("Cannot create {}: {}", dest_dir.display(), e))
    })
}

/// Copy `source` into `dest_dir` as `dest_filename`, keeping the source's
/// access and modification times. An existing file of that name is replaced.
pub fn copy_to_destination(source: &Path, dest_dir: &Path, dest_filename: &str) -> Result<PathBuf> {
    let dest_path = dest_dir.join(dest_filename);

    fs::copy(source, &dest_path).map_err(|e| {
        CatalogError::Copy(format!(
            "Failed to copy {} to {}: {}",
            source.display(),
            dest_path.display(),
            e
        ))
    })?;

    preserve_times(source, &dest_path)?;

    Ok(dest_path)
}

fn preserve_times(source: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(source)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);

    filetime::set_file_times(dest, atime, mtime).map_err(|e| {
        CatalogError::Copy(format!("Failed to set times on {}: {}", dest.display(), e))
    })
}
