// FFprobe wrapper for metadata extraction

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::constants::PROBE_POLL_INTERVAL_MS;
use crate::error::{CatalogError, Result};
use crate::metadata::{file_size, MetadataProber, VideoMetadata};

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    streams: Option<Vec<FFprobeStream>>,
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

/// Runs ffprobe as a subprocess with a bounded wait
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe: PathBuf,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(ffprobe: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            timeout,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.ffprobe_path.clone(), config.probe_timeout)
    }

    /// Check if the configured ffprobe can be run
    pub fn is_available(&self) -> bool {
        crate::tools::is_tool_available(&self.ffprobe)
    }

    /// Run ffprobe and return its stdout
    fn run(&self, path: &Path) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.ffprobe)
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CatalogError::Probe(format!("Failed to run ffprobe: {}", e)))?;

        // Drain stdout on a separate thread so a large report cannot fill the pipe
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CatalogError::Probe("ffprobe stdout not captured".to_string()))?;
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let status = match self.wait_with_deadline(&mut child) {
            Ok(status) => status,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                return Err(e);
            }
        };

        let output = reader
            .join()
            .map_err(|_| CatalogError::Probe("ffprobe output reader panicked".to_string()))??;

        if !status.success() {
            return Err(CatalogError::Probe(format!("ffprobe failed: {}", status)));
        }

        Ok(output)
    }

    fn wait_with_deadline(&self, child: &mut std::process::Child) -> Result<ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                return Err(CatalogError::Probe(format!(
                    "ffprobe timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                )));
            }
            thread::sleep(Duration::from_millis(PROBE_POLL_INTERVAL_MS));
        }
    }
}

impl MetadataProber for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        let size = file_size(path)?;

        match self.run(path).and_then(|stdout| parse_probe_output(&stdout, size)) {
            Ok(meta) => Ok(meta),
            Err(e) => {
                log::warn!("Could not extract metadata for {}: {}", path.display(), e);
                Ok(VideoMetadata::size_only(size))
            }
        }
    }
}

/// Parse ffprobe JSON into metadata.
/// Any malformed field fails the whole parse; the caller degrades to size-only.
pub fn parse_probe_output(stdout: &[u8], file_size: i64) -> Result<VideoMetadata> {
    let probe_output: FFprobeOutput = serde_json::from_slice(stdout)?;

    let mut meta = VideoMetadata::size_only(file_size);

    let video_stream = probe_output
        .streams
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    if let Some(stream) = video_stream {
        meta.width = stream.width;
        meta.height = stream.height;
        meta.codec = stream.codec_name.clone();
    }

    if let Some(ref format) = probe_output.format {
        meta.duration = parse_duration_secs(format.duration.as_deref())?;
        meta.bitrate = parse_bitrate(format.bit_rate.as_deref())?;
    }

    Ok(meta)
}

/// Parse a duration string like "12.345000" to whole seconds
fn parse_duration_secs(duration_str: Option<&str>) -> Result<Option<i64>> {
    let duration_str = match duration_str {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    let seconds: f64 = duration_str
        .trim()
        .parse()
        .map_err(|_| CatalogError::Probe(format!("Invalid duration: {}", duration_str)))?;

    if !seconds.is_finite() {
        return Err(CatalogError::Probe(format!("Invalid duration: {}", duration_str)));
    }

    Ok(Some(seconds.trunc() as i64))
}

fn parse_bitrate(bitrate_str: Option<&str>) -> Result<Option<i64>> {
    match bitrate_str {
        Some(s) if !s.is_empty() => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CatalogError::Probe(format!("Invalid bitrate: {}", s))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "aac", "codec_type": "audio", "channels": 2},
            {"index": 1, "codec_name": "h264", "codec_type": "video", "width": 1920, "height": 1080},
            {"index": 2, "codec_name": "hevc", "codec_type": "video", "width": 640, "height": 360}
        ],
        "format": {"filename": "clip.mp4", "duration": "125.873000", "bit_rate": "4718592"}
    }"#;

    #[test]
    fn test_parse_first_video_stream() {
        let meta = parse_probe_output(SAMPLE.as_bytes(), 99).unwrap();
        assert_eq!(meta.width, Some(1920));
        assert_eq!(meta.height, Some(1080));
        assert_eq!(meta.codec.as_deref(), Some("h264"));
        assert_eq!(meta.duration, Some(125));
        assert_eq!(meta.bitrate, Some(4_718_592));
        assert_eq!(meta.file_size, 99);
    }

    #[test]
    fn test_parse_audio_only() {
        let json = r#"{
            "streams": [{"codec_name": "mp3", "codec_type": "audio"}],
            "format": {"duration": "3.9", "bit_rate": "128000"}
        }"#;
        let meta = parse_probe_output(json.as_bytes(), 10).unwrap();
        assert_eq!(meta.width, None);
        assert_eq!(meta.height, None);
        assert_eq!(meta.codec, None);
        assert_eq!(meta.duration, Some(3));
        assert_eq!(meta.bitrate, Some(128_000));
    }

    #[test]
    fn test_parse_missing_format() {
        let json = r#"{"streams": [{"codec_name": "vp9", "codec_type": "video", "width": 320, "height": 240}]}"#;
        let meta = parse_probe_output(json.as_bytes(), 1).unwrap();
        assert_eq!(meta.codec.as_deref(), Some("vp9"));
        assert_eq!(meta.duration, None);
        assert_eq!(meta.bitrate, None);
    }

    #[test]
    fn test_parse_empty_object() {
        let meta = parse_probe_output(b"{}", 7).unwrap();
        assert_eq!(meta, VideoMetadata::size_only(7));
    }

    #[test]
    fn test_malformed_duration_is_error() {
        let json = r#"{"format": {"duration": "N/A", "bit_rate": "1000"}}"#;
        assert!(parse_probe_output(json.as_bytes(), 1).is_err());
    }

    #[test]
    fn test_malformed_bitrate_is_error() {
        let json = r#"{"format": {"duration": "1.0", "bit_rate": "fast"}}"#;
        assert!(parse_probe_output(json.as_bytes(), 1).is_err());
    }

    #[test]
    fn test_not_json_is_error() {
        assert!(parse_probe_output(b"ffprobe version 6.0", 1).is_err());
    }

    #[test]
    fn test_missing_binary_degrades_to_size_only() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let prober = FfprobeProber::new("/nonexistent/bin/ffprobe", Duration::from_secs(1));
        assert!(!prober.is_available());

        let meta = prober.probe(file.path()).unwrap();
        assert_eq!(meta, VideoMetadata::size_only(2048));
    }

    #[test]
    fn test_missing_file_is_error() {
        let prober = FfprobeProber::new("/nonexistent/bin/ffprobe", Duration::from_secs(1));
        assert!(prober.probe(Path::new("/nonexistent/clip.mp4")).is_err());
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_script_output_is_parsed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let script = write_script(
            tmp.path(),
            "fake-ffprobe",
            r#"echo '{"streams":[{"codec_type":"video","codec_name":"av1","width":1280,"height":720}],"format":{"duration":"61.5","bit_rate":"900000"}}'"#,
        );
        let media = tmp.path().join("clip.mp4");
        std::fs::write(&media, b"0123456789").unwrap();

        let prober = FfprobeProber::new(&script, Duration::from_secs(5));
        let meta = prober.probe(&media).unwrap();

        assert_eq!(meta.codec.as_deref(), Some("av1"));
        assert_eq!(meta.width, Some(1280));
        assert_eq!(meta.height, Some(720));
        assert_eq!(meta.duration, Some(61));
        assert_eq!(meta.bitrate, Some(900_000));
        assert_eq!(meta.file_size, 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_degrades() {
        let tmp = tempfile::TempDir::new().unwrap();
        let script = write_script(tmp.path(), "broken-ffprobe", "exit 1");
        let media = tmp.path().join("clip.mp4");
        std::fs::write(&media, b"abc").unwrap();

        let prober = FfprobeProber::new(&script, Duration::from_secs(5));
        assert_eq!(prober.probe(&media).unwrap(), VideoMetadata::size_only(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_degrades() {
        let tmp = tempfile::TempDir::new().unwrap();
        let script = write_script(tmp.path(), "slow-ffprobe", "exec sleep 30");
        let media = tmp.path().join("clip.mp4");
        std::fs::write(&media, b"abcd").unwrap();

        let prober = FfprobeProber::new(&script, Duration::from_millis(200));
        let started = Instant::now();
        let meta = prober.probe(&media).unwrap();

        assert_eq!(meta, VideoMetadata::size_only(4));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
