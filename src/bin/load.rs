//! Load Binary - destructive replace-load of normalized JSONL into SQLite
//!
//! Clears the videos table unconditionally, then bulk-inserts every record
//! from the given file (or every file in the given directory, in file-name
//! order), reporting per-file throughput. Malformed lines are skipped with
//! a diagnostic; an unreadable path or unopenable store aborts the run.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin load -- <clean.jsonl | clean_dir/>
//! ```
//!
//! ## Environment Variables
//!
//! - VIDFLOW_DB_PATH - SQLite database path (default: data/vidflow.db)
//! - RUST_LOG - logging level (optional, default: info)

use std::env;
use std::process;
use vidflow::{BatchLoader, Config, VideoStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env();
    let input = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: load <clean.jsonl | clean_dir/>");
        process::exit(2);
    });

    log::info!("🚀 Replace-loading {} into {}", input, config.db_path);

    let mut store = VideoStore::open(&config.db_path)?;
    let report = BatchLoader::new(&mut store).replace_load(&input)?;

    for file in &report.files {
        if file.inserted == 0 {
            log::warn!("⚠️ {}: no valid records", file.path.display());
        } else {
            log::info!(
                "   ├─ {}: {} inserted, {} skipped, {:.4}s",
                file.path.display(),
                file.inserted,
                file.skipped,
                file.elapsed_secs
            );
        }
    }
    log::info!(
        "✅ Load complete: {} inserted, {} skipped, store count {}",
        report.total_inserted,
        report.total_skipped,
        report.final_count
    );

    Ok(())
}
