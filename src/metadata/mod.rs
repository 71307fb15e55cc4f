// Metadata extraction module

pub mod ffprobe;

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Result;

pub use ffprobe::FfprobeProber;

/// Media metadata recorded with each catalog entry.
/// Everything except `file_size` is absent when probing fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Container duration, whole seconds (fraction truncated)
    pub duration: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Codec of the first video stream
    pub codec: Option<String>,
    /// Container-level bitrate
    pub bitrate: Option<i64>,
    pub file_size: i64,
}

impl VideoMetadata {
    /// Degraded record: only the filesystem size is known
    pub fn size_only(file_size: i64) -> Self {
        Self {
            file_size,
            ..Default::default()
        }
    }

    pub fn has_media_info(&self) -> bool {
        self.duration.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.codec.is_some()
            || self.bitrate.is_some()
    }
}

/// Capability for extracting media metadata from a file.
///
/// Implementations absorb tool failures and return `VideoMetadata::size_only`;
/// the only error surfaced is failing to stat the file itself.
pub trait MetadataProber {
    fn probe(&self, path: &Path) -> Result<VideoMetadata>;
}

/// Read the file size used by every prober
pub fn file_size(path: &Path) -> Result<i64> {
    Ok(std::fs::metadata(path)?.len() as i64)
}
