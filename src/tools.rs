// External tool resolver for ffprobe
//
// Resolution order:
// 1) Environment variable override (VIDCAT_FFPROBE_PATH)
// 2) Sidecar next to the executable (or in its bin/ subdirectory)
// 3) PATH fallback

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::ENV_FFPROBE_PATH;

/// Get the directory containing the current executable
fn exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

/// Resolve a tool path.
fn resolve_tool(env_key: &str, default_name: &str) -> PathBuf {
    if let Ok(v) = env::var(env_key) {
        let p = PathBuf::from(&v);
        if p.exists() {
            return p;
        }
        log::warn!("{} points at missing file {}, ignoring", env_key, v);
    }

    let mut filename = default_name.to_string();
    if cfg!(windows) && !filename.to_lowercase().ends_with(".exe") {
        filename.push_str(".exe");
    }

    if let Some(dir) = exe_dir() {
        let candidate = dir.join(&filename);
        if candidate.exists() {
            return candidate;
        }

        let bin_candidate = dir.join("bin").join(&filename);
        if bin_candidate.exists() {
            return bin_candidate;
        }
    }

    PathBuf::from(default_name)
}

/// Get path to ffprobe binary
pub fn ffprobe_path() -> PathBuf {
    resolve_tool(ENV_FFPROBE_PATH, "ffprobe")
}

/// Check if a tool can be run from the given path
pub fn is_tool_available(path: &Path) -> bool {
    if path.is_file() {
        return true;
    }

    // PATH lookup: try running it
    std::process::Command::new(path)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tool_fallback() {
        let path = resolve_tool("VIDCAT_TEST_NONEXISTENT", "testcmd");
        assert_eq!(path, PathBuf::from("testcmd"));
    }

    #[test]
    fn test_env_override() {
        let temp = tempfile::NamedTempFile::new().unwrap();

        std::env::set_var("VIDCAT_TEST_TOOL", temp.path());
        let path = resolve_tool("VIDCAT_TEST_TOOL", "default");
        assert_eq!(path, temp.path());

        std::env::remove_var("VIDCAT_TEST_TOOL");
    }

    #[test]
    fn test_missing_tool_not_available() {
        assert!(!is_tool_available(Path::new("/nonexistent/dir/ffprobe")));
    }
}
