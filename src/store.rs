//! SQLite store handle for the videos table (write side)
//!
//! One logical collection, fully replaced on each load. There is no
//! secondary index: `related` is stored as a JSON array column and reverse
//! lookups scan it. Rowid insertion order is the deterministic tie-break
//! used by the query layer.

use crate::record::VideoRecord;
use crate::sqlite_pragma::apply_optimized_pragmas;
use rusqlite::{params, Connection};
use std::path::Path;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Database(rusqlite::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Serialization(e) => write!(f, "Serialization error: {}", e),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Write-side handle over the videos table.
///
/// Opened once at process start and passed to the loader; there is no
/// process-wide cached connection.
pub struct VideoStore {
    conn: Connection,
}

impl VideoStore {
    /// Open (creating if needed) the store at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        apply_optimized_pragmas(&conn)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS videos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                video_id TEXT NOT NULL,
                uploader TEXT NOT NULL,
                category TEXT NOT NULL,
                duration INTEGER,
                views INTEGER,
                rating REAL,
                related TEXT NOT NULL
            )",
            [],
        )?;

        log::info!("✅ SQLite store initialized with WAL mode");
        Ok(Self { conn })
    }

    /// Delete every row. Destructive and not atomic with the reload that
    /// follows: a concurrent reader sees an empty or partially loaded table
    /// until the load completes.
    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        let removed = self.conn.execute("DELETE FROM videos", [])?;
        log::info!("🧹 Cleared {} existing records", removed);
        Ok(removed)
    }

    /// Insert one file's worth of records in a single transaction.
    pub fn insert_batch(&mut self, records: &[VideoRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO videos
                 (video_id, uploader, category, duration, views, rating, related)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for record in records {
                let related_json = serde_json::to_string(&record.related)?;
                stmt.execute(params![
                    record.video_id,
                    record.uploader,
                    record.category,
                    record.duration,
                    record.views,
                    record.rating,
                    related_json,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Count all rows. Observational check after a load, not a consistency
    /// proof.
    pub fn total_count(&self) -> Result<i64, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;
        Ok(count)
    }
}
