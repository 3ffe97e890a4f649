//! Environment-driven configuration shared by the pipeline binaries

use crate::sampler::DEFAULT_SAMPLE_SEED;
use std::env;

/// Default database location when VIDFLOW_DB_PATH is unset.
pub const DEFAULT_DB_PATH: &str = "data/vidflow.db";

/// Configuration loaded from environment variables
pub struct Config {
    pub db_path: String,
    pub sample_seed: u64,
    pub rust_log: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - VIDFLOW_DB_PATH: SQLite database path (default: data/vidflow.db)
    /// - SAMPLE_SEED: seed for the reduce stage (default: 42)
    /// - RUST_LOG: logging level (optional, default: info)
    pub fn from_env() -> Self {
        let db_path = env::var("VIDFLOW_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        let sample_seed = env::var("SAMPLE_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_SEED);

        let rust_log = env::var("RUST_LOG").ok();

        Self {
            db_path,
            sample_seed,
            rust_log,
        }
    }
}
