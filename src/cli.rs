// Video Catalog CLI binary

use std::path::PathBuf;
use std::time::Duration;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use video_catalog::constants::{
    CATALOG_TABLE, DEFAULT_DB_FILENAME, DEFAULT_DEST_FOLDER, DEFAULT_LIST_LIMIT,
    DEFAULT_SOURCE_FOLDER, ENV_DB_PATH, ENV_DEST_DIR, ENV_PROBE_TIMEOUT_SECS,
    ENV_SOURCE_DIR, PROBE_TIMEOUT_SECS,
};
use video_catalog::db::{self, CatalogStore, SqliteCatalogStore};
use video_catalog::ingest::{self, FileOutcome};
use video_catalog::metadata::FfprobeProber;
use video_catalog::{reconcile, tools, CatalogConfig};

#[derive(Parser)]
#[command(name = "vidcat")]
#[command(about = "Video Catalog - copy videos under hashed names and record their metadata", long_about = None)]
#[command(version)]
struct Cli {
    /// Catalog database file
    #[arg(long, global = true, env = ENV_DB_PATH, default_value = DEFAULT_DB_FILENAME)]
    db: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog database and table if missing
    Init,

    /// Copy new videos from the source folder and catalog them
    Ingest {
        /// Folder scanned for new videos
        #[arg(short, long, env = ENV_SOURCE_DIR, default_value = DEFAULT_SOURCE_FOLDER)]
        source: PathBuf,
        /// Folder receiving the renamed copies
        #[arg(short, long, env = ENV_DEST_DIR, default_value = DEFAULT_DEST_FOLDER)]
        dest: PathBuf,
        /// ffprobe executable (defaults to VIDCAT_FFPROBE_PATH, a bundled copy, or PATH)
        #[arg(long)]
        ffprobe: Option<PathBuf>,
        /// Seconds to wait for ffprobe per file
        #[arg(long, env = ENV_PROBE_TIMEOUT_SECS, default_value_t = PROBE_TIMEOUT_SECS)]
        probe_timeout: u64,
    },

    /// List cataloged videos, newest first
    List {
        /// Maximum entries to show
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,
    },

    /// Report copies in the destination folder that have no catalog row
    Orphans {
        /// Folder holding the renamed copies
        #[arg(short, long, env = ENV_DEST_DIR, default_value = DEFAULT_DEST_FOLDER)]
        dest: PathBuf,
    },
}

fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init => cmd_init(cli.db),
        Commands::Ingest { source, dest, ffprobe, probe_timeout } => {
            let config = CatalogConfig::default()
                .with_source_dir(source)
                .with_dest_dir(dest)
                .with_db_path(cli.db)
                .with_ffprobe_path(ffprobe.unwrap_or_else(tools::ffprobe_path))
                .with_probe_timeout(Duration::from_secs(probe_timeout));
            cmd_ingest(&config)
        }
        Commands::List { limit } => cmd_list(cli.db, limit),
        Commands::Orphans { dest } => cmd_orphans(cli.db, dest),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_init(db_path: PathBuf) -> Result<()> {
    println!("Initializing video library database...");
    println!();

    let report = db::provision(&db_path)
        .with_context(|| format!("Could not provision {}", db_path.display()))?;

    if report.already_existed {
        println!("Database '{}' already exists", report.db_path.display());
    } else {
        println!("Database '{}' created", report.db_path.display());
    }
    println!("Table '{}' ready (schema version {})", CATALOG_TABLE, report.schema_version);
    println!();
    println!("Table schema:");
    println!("  hash_name          - Unique hash identifier (16 hex chars)");
    println!("  original_filename  - Original file name (unique)");
    println!("  file_extension     - File extension (.mp4, .avi, etc)");
    println!("  duration           - Video duration in seconds");
    println!("  width              - Video width in pixels");
    println!("  height             - Video height in pixels");
    println!("  codec              - Video codec (h264, etc)");
    println!("  bitrate            - Container bitrate");
    println!("  file_size          - File size in bytes");
    println!("  created_at         - Timestamp when added");
    println!();
    println!("Next step: run 'vidcat ingest' to add videos to the library");

    Ok(())
}

fn cmd_ingest(config: &CatalogConfig) -> Result<()> {
    // Configuration checks happen before any file is touched
    if !config.source_dir.is_dir() {
        anyhow::bail!("Folder '{}' does not exist", config.source_dir.display());
    }
    let store = SqliteCatalogStore::open(&config.db_path)?;

    let prober = FfprobeProber::from_config(config);
    if !prober.is_available() {
        log::warn!(
            "ffprobe not available at {}; metadata will be left empty",
            config.ffprobe_path.display()
        );
    }

    println!("Scanning {} for new files...", config.source_dir.display());
    println!();

    let result = ingest::run_ingest_with_progress(config, &store, &prober, &mut print_outcome)?;

    println!("{}", "=".repeat(50));
    println!("Added:   {} new file(s)", result.added);
    println!("Skipped: {} existing file(s)", result.skipped);
    if result.failed > 0 {
        println!("Failed:  {} file(s)", result.failed);
    }
    println!("{}", "=".repeat(50));

    Ok(())
}

fn print_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Skipped { filename, existing_hash } => {
            println!("SKIP: {} (already in database as {})", filename, existing_hash);
        }
        FileOutcome::Added { filename, hash_name, stored_filename, metadata } => {
            println!("ADD:  {}", filename);
            println!("   Hash: {}", hash_name);
            println!("   Copied to {}", stored_filename);
            if let Some(duration) = metadata.duration {
                println!("   Duration: {}", format_duration(duration));
            }
            if let (Some(w), Some(h)) = (metadata.width, metadata.height) {
                println!("   Resolution: {}x{}", w, h);
            }
            if let Some(ref codec) = metadata.codec {
                println!("   Codec: {}", codec);
            }
            if !metadata.has_media_info() {
                println!("   No media info (ffprobe unavailable or failed)");
            }
            println!("   Added to database");
            println!();
        }
        FileOutcome::Failed { filename, stage, error } => {
            println!("FAIL: {} ({} step): {}", filename, stage, error);
            println!();
        }
    }
}

fn cmd_list(db_path: PathBuf, limit: u32) -> Result<()> {
    let limit = i64::from(limit);
    let store = SqliteCatalogStore::open(&db_path)?;
    let entries = store.list(limit)?;
    let total = store.count()?;

    println!("Catalog: {} ({} videos total)", db_path.display(), total);
    println!();

    if entries.is_empty() {
        println!("No videos cataloged. Use 'vidcat ingest' to add some.");
        return Ok(());
    }

    println!("{:<22}  {:>9}  {:>11}  {:>10}  {}", "Stored As", "Duration", "Resolution", "Size", "Original");
    println!("{}", "-".repeat(80));

    for entry in &entries {
        let duration = entry.duration
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string());
        let resolution = match (entry.width, entry.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "-".to_string(),
        };

        println!("{:<22}  {:>9}  {:>11}  {:>10}  {}",
            entry.stored_filename(),
            duration,
            resolution,
            format_size(entry.file_size),
            entry.original_filename
        );
    }

    if total > limit {
        println!();
        println!("Showing {} of {} videos. Use --limit to see more.", limit, total);
    }

    Ok(())
}

fn cmd_orphans(db_path: PathBuf, dest: PathBuf) -> Result<()> {
    let store = SqliteCatalogStore::open(&db_path)?;
    let orphans = reconcile::find_orphans(&dest, &store)?;

    if orphans.is_empty() {
        println!("No orphaned copies in {}", dest.display());
        return Ok(());
    }

    println!("{} file(s) in {} have no catalog row:", orphans.len(), dest.display());
    for orphan in &orphans {
        println!("  {}", orphan.path.display());
    }
    println!();
    println!("These are left in place. Remove them by hand or re-run 'vidcat ingest'.");

    Ok(())
}

// --- Helper Functions ---

/// Seconds as H:MM:SS
fn format_duration(total_seconds: i64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
