// Video Catalog Constants

// Folders and database
pub const DEFAULT_SOURCE_FOLDER: &str = "videos";
pub const DEFAULT_DEST_FOLDER: &str = "renamed_videos";
pub const DEFAULT_DB_FILENAME: &str = "video_library.db";
pub const CATALOG_TABLE: &str = "video_mapping";

// Hashing
pub const HASH_NAME_LEN: usize = 16;

// Probing
pub const PROBE_TIMEOUT_SECS: u64 = 10;
pub const PROBE_POLL_INTERVAL_MS: u64 = 20;

// Environment overrides
pub const ENV_SOURCE_DIR: &str = "VIDCAT_SOURCE_DIR";
pub const ENV_DEST_DIR: &str = "VIDCAT_DEST_DIR";
pub const ENV_DB_PATH: &str = "VIDCAT_DB_PATH";
pub const ENV_FFPROBE_PATH: &str = "VIDCAT_FFPROBE_PATH";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "VIDCAT_PROBE_TIMEOUT_SECS";

// Listing
pub const DEFAULT_LIST_LIMIT: u32 = 100;
