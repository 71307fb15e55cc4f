// Identity hashing using SHA-256
//
// The identifier is derived from (filename, modification time, size), not from
// file content. It is truncated to 64 bits for the on-disk name; the full digest
// is kept on IdentityHash for callers that need it.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::constants::HASH_NAME_LEN;
use crate::error::Result;

/// Full SHA-256 digest of a file's identity string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHash {
    digest: [u8; 32],
}

impl IdentityHash {
    /// Hash the concatenation `filename + mtime + size`
    pub fn from_parts(filename: &str, mtime: &str, size: u64) -> Self {
        let unique_string = format!("{}{}{}", filename, mtime, size);
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(unique_string.as_bytes()));
        Self { digest }
    }

    /// 16-character lowercase hex identifier used as the stored file name
    pub fn hash_name(&self) -> String {
        let mut hex = self.full_hex();
        hex.truncate(HASH_NAME_LEN);
        hex
    }

    pub fn full_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// Compute the identity hash for a file on disk.
/// Stat failures propagate to the caller.
pub fn compute_identity_hash(filename: &str, path: &Path) -> Result<IdentityHash> {
    let meta = fs::metadata(path)?;
    let modified = meta.modified()?;

    Ok(IdentityHash::from_parts(
        filename,
        &format_mtime(modified),
        meta.len(),
    ))
}

/// Compute the 16-hex-char hash name for a file
pub fn generate_hash_name(filename: &str, path: &Path) -> Result<String> {
    Ok(compute_identity_hash(filename, path)?.hash_name())
}

/// Seconds since the Unix epoch as a shortest round-trip decimal.
/// Whole seconds keep a trailing ".0" (e.g. "1700000000.0").
pub fn format_mtime(modified: SystemTime) -> String {
    let secs = match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    };

    if secs.fract() == 0.0 {
        format!("{:.1}", secs)
    } else {
        format!("{}", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use filetime::FileTime;
    use tempfile::NamedTempFile;

    #[test]
    fn test_known_digest() {
        let hash = IdentityHash::from_parts("clip.mp4", "1700000000.0", 10_485_760);
        assert_eq!(
            hash.full_hex(),
            "49da2605e5076c4449ed342c9d227e33a2319bf7b11f2941f96c274f75f048fb"
        );
        assert_eq!(hash.hash_name(), "49da2605e5076c44");
    }

    #[test]
    fn test_format_mtime() {
        let whole = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_mtime(whole), "1700000000.0");

        let frac = UNIX_EPOCH + Duration::from_millis(1_700_000_000_250);
        assert_eq!(format_mtime(frac), "1700000000.25");
    }

    #[test]
    fn test_hash_name_shape() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not really a video").unwrap();

        let name = generate_hash_name("clip.mp4", file.path()).unwrap();
        assert_eq!(name.len(), 16);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"same bytes").unwrap();

        let a = generate_hash_name("clip.mp4", file.path()).unwrap();
        let b = generate_hash_name("clip.mp4", file.path()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mtime_change_changes_hash() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"same bytes").unwrap();

        filetime::set_file_mtime(file.path(), FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
        let before = generate_hash_name("clip.mp4", file.path()).unwrap();

        filetime::set_file_mtime(file.path(), FileTime::from_unix_time(1_600_000_100, 0)).unwrap();
        let after = generate_hash_name("clip.mp4", file.path()).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_filename_participates_in_hash() {
        let file = NamedTempFile::new().unwrap();
        let a = generate_hash_name("a.mp4", file.path()).unwrap();
        let b = generate_hash_name("b.mp4", file.path()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(generate_hash_name("gone.mp4", Path::new("/nonexistent/gone.mp4")).is_err());
    }
}
