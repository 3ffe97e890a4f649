//! Report Binary - runs the query surface and prints a JSON summary
//!
//! Read-only. Intended as a sanity check after a load and as the reference
//! consumer of the query contract offered to dashboards and the external
//! cluster-compute job.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin report -- [--video-id ID] [--uploader NAME]
//! ```
//!
//! ## Environment Variables
//!
//! - VIDFLOW_DB_PATH - SQLite database path (default: data/vidflow.db)
//! - RUST_LOG - logging level (optional, default: info)

use chrono::Utc;
use serde_json::json;
use std::env;
use vidflow::queries::{DEFAULT_TOP_CATEGORIES, DEFAULT_UPLOADER_LIMIT};
use vidflow::{Config, VideoQueries};

struct ReportArgs {
    video_id: Option<String>,
    uploader: Option<String>,
}

fn parse_args() -> ReportArgs {
    let mut video_id = None;
    let mut uploader = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--video-id" => video_id = args.next(),
            "--uploader" => uploader = args.next(),
            _ => {}
        }
    }
    ReportArgs { video_id, uploader }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env();
    let args = parse_args();

    let queries = VideoQueries::open(&config.db_path)?;

    let mut out = json!({
        "generated_at": Utc::now().timestamp(),
        "db_path": config.db_path,
        "total_count": queries.total_count()?,
        "top_categories": queries.top_categories(DEFAULT_TOP_CATEGORIES)?,
    });

    if let Some(video_id) = &args.video_id {
        let reverse = queries.reverse_related(video_id)?;
        out["lookup_video"] = json!(queries.find_by_id(video_id)?);
        out["reverse_related_count"] = json!(reverse.len());
        out["reverse_related_head"] = json!(reverse
            .iter()
            .take(20)
            .map(|r| r.video_id.as_str())
            .collect::<Vec<_>>());
    }

    if let Some(uploader) = &args.uploader {
        out["uploader_results"] = json!(queries.find_by_uploader(uploader, DEFAULT_UPLOADER_LIMIT)?);
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
