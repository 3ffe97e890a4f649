//! vidflow - batch pipeline for large tab-delimited video-metadata dumps
//!
//! Stages (each driven by its own binary, all one-way batch operations):
//! 1. `normalize` - raw TSV rows → canonical JSONL records
//! 2. `reduce` - seeded random sampling down to a target line count
//! 3. `load` - destructive replace-load of JSONL files into SQLite
//! 4. `report` - aggregation/lookup queries over the loaded table

pub mod config;
pub mod loader;
pub mod queries;
pub mod record;
pub mod sampler;
pub mod sqlite_pragma;
pub mod store;

pub use config::Config;
pub use loader::{BatchLoader, FileReport, LoadReport, LoaderError};
pub use queries::{CategoryCount, VideoQueries};
pub use record::{normalize_fields, normalize_row, VideoRecord};
pub use sampler::{reduce_file, sample_lines};
pub use store::{StoreError, VideoStore};
