//! Video record normalization from raw tab-delimited rows
//!
//! The raw dumps carry at least nine tab-separated columns per row; columns
//! are extracted by fixed position and coerced into the canonical record.
//! Rows that are too short or fail coercion are rejected whole, never
//! partially emitted.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Minimum raw column count for a row to be usable.
pub const MIN_RAW_FIELDS: usize = 9;

/// Canonical video-metadata record.
///
/// Numeric fields are nullable: a source field that does not match the
/// expected numeric pattern becomes `None`, never a string. `related` holds
/// ids of other videos; entries may dangle (the target need not be loaded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "videoID")]
    pub video_id: String,
    pub uploader: String,
    pub category: String,
    pub duration: Option<i64>,
    pub views: Option<i64>,
    pub rating: Option<f64>,
    pub related: Vec<String>,
}

impl VideoRecord {
    /// Parse a record from one normalized JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serialize the record as one JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Integer coercion: accepts only non-empty all-digit fields.
fn parse_digits(field: &str) -> Option<i64> {
    if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}

/// Float coercion: accepts digits with at most one decimal point.
fn parse_decimal(field: &str) -> Option<f64> {
    let stripped = field.replacen('.', "", 1);
    if !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}

/// Normalize one raw row already split into ordered fields.
///
/// Returns `None` when the row has fewer than [`MIN_RAW_FIELDS`] fields or
/// when the video id is empty after trimming. Column positions are fixed:
/// 0 → videoID, 1 → uploader, 3 → category, 4 → duration, 5 → views,
/// 6 → rating, 9.. → related. Pure function, no side effects.
pub fn normalize_fields(fields: &[&str]) -> Option<VideoRecord> {
    if fields.len() < MIN_RAW_FIELDS {
        return None;
    }
    let video_id = fields[0].trim();
    if video_id.is_empty() {
        return None;
    }
    Some(VideoRecord {
        video_id: video_id.to_string(),
        uploader: fields[1].trim().to_string(),
        category: fields[3].trim().to_string(),
        duration: parse_digits(fields[4]),
        views: parse_digits(fields[5]),
        rating: parse_decimal(fields[6]),
        related: fields[9..]
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Normalize one raw tab-delimited line.
pub fn normalize_row(line: &str) -> Option<VideoRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    normalize_fields(&fields)
}

/// Normalize a whole raw TSV file into a JSONL file.
///
/// Rejected rows are dropped and counted, not written. `max_rows` caps how
/// many input rows are examined (useful to stay within a data budget).
///
/// Returns (kept, dropped).
pub fn normalize_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    max_rows: Option<usize>,
) -> io::Result<(usize, usize)> {
    let reader = BufReader::new(File::open(input)?);
    let mut out = BufWriter::new(File::create(output.as_ref())?);

    let mut kept = 0usize;
    let mut dropped = 0usize;
    for (i, line) in reader.lines().enumerate() {
        if let Some(max) = max_rows {
            if i >= max {
                break;
            }
        }
        let line = line?;
        match normalize_row(&line) {
            Some(record) => {
                let json = serde_json::to_string(&record)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                writeln!(out, "{}", json)?;
                kept += 1;
            }
            None => dropped += 1,
        }
    }
    out.flush()?;

    log::info!(
        "✅ Normalized {} rows ({} dropped) into {}",
        kept,
        dropped,
        output.as_ref().display()
    );
    Ok((kept, dropped))
}
