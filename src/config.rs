// Runtime configuration passed explicitly into each component

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DB_FILENAME, DEFAULT_DEST_FOLDER, DEFAULT_SOURCE_FOLDER, PROBE_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Folder scanned for new videos (direct entries only)
    pub source_dir: PathBuf,
    /// Folder receiving the renamed copies
    pub dest_dir: PathBuf,
    /// SQLite catalog database file
    pub db_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub probe_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_FOLDER),
            dest_dir: PathBuf::from(DEFAULT_DEST_FOLDER),
            db_path: PathBuf::from(DEFAULT_DB_FILENAME),
            ffprobe_path: crate::tools::ffprobe_path(),
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
        }
    }
}

impl CatalogConfig {
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    pub fn with_dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = dir.into();
        self
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = path.into();
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("videos"));
        assert_eq!(config.dest_dir, PathBuf::from("renamed_videos"));
        assert_eq!(config.db_path, PathBuf::from("video_library.db"));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_overrides() {
        let config = CatalogConfig::default()
            .with_source_dir("/in")
            .with_dest_dir("/out")
            .with_db_path("/tmp/cat.db")
            .with_ffprobe_path("/opt/ffprobe")
            .with_probe_timeout(Duration::from_secs(3));

        assert_eq!(config.source_dir, PathBuf::from("/in"));
        assert_eq!(config.dest_dir, PathBuf::from("/out"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/cat.db"));
        assert_eq!(config.ffprobe_path, PathBuf::from("/opt/ffprobe"));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
    }
}
