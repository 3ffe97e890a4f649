//! Read-only aggregation and lookup queries over the videos table
//!
//! Opened on its own connection with query_only set, so a dashboard or
//! report process can never write through this handle. No isolation from a
//! concurrent replace-load is provided: a reader during the clear/reload
//! window observes an empty or partially loaded table.

use crate::record::VideoRecord;
use crate::sqlite_pragma::apply_optimized_pragmas;
use crate::store::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;

/// Default truncation for [`VideoQueries::top_categories`].
pub const DEFAULT_TOP_CATEGORIES: usize = 10;

/// Default truncation for [`VideoQueries::find_by_uploader`].
pub const DEFAULT_UPLOADER_LIMIT: usize = 5;

/// Per-category record count.
///
/// This shape (category, count, descending by count) is the interface
/// contract shared with the external cluster-compute job that recomputes
/// the same aggregation at scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<VideoRecord> {
    let related_json: String = row.get(6)?;
    let related: Vec<String> = serde_json::from_str(&related_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(VideoRecord {
        video_id: row.get(0)?,
        uploader: row.get(1)?,
        category: row.get(2)?,
        duration: row.get(3)?,
        views: row.get(4)?,
        rating: row.get(5)?,
        related,
    })
}

const RECORD_COLUMNS: &str = "video_id, uploader, category, duration, views, rating, related";

/// Read-only query handle over the videos table.
pub struct VideoQueries {
    conn: Connection,
}

impl VideoQueries {
    /// Open a read-only handle at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        apply_optimized_pragmas(&conn)?;
        // Must come after the PRAGMAs: query_only rejects further writes.
        conn.execute("PRAGMA query_only = ON", [])?;
        Ok(Self { conn })
    }

    /// Count of all loaded records.
    pub fn total_count(&self) -> Result<i64, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Group by category, count per group, descending by count, truncated
    /// to `limit`. Equal counts break ties on first-insertion rowid, so the
    /// ordering is stable across runs on identical input.
    pub fn top_categories(&self, limit: usize) -> Result<Vec<CategoryCount>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) AS cnt
             FROM videos
             GROUP BY category
             ORDER BY cnt DESC, MIN(id) ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// First record with the given video id, in insertion order.
    ///
    /// Duplicate ids are permitted upstream; first-match is the committed
    /// policy, not an error.
    pub fn find_by_id(&self, video_id: &str) -> Result<Option<VideoRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM videos WHERE video_id = ?1 ORDER BY id ASC LIMIT 1",
            RECORD_COLUMNS
        );
        let record = self
            .conn
            .query_row(&sql, params![video_id], row_to_record)
            .optional()?;
        Ok(record)
    }

    /// Up to `limit` records with an exact (case-sensitive) uploader match.
    pub fn find_by_uploader(
        &self,
        uploader: &str,
        limit: usize,
    ) -> Result<Vec<VideoRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM videos WHERE uploader = ?1 ORDER BY id ASC LIMIT ?2",
            RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![uploader, limit as i64], row_to_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Every record whose related list contains `target_id` as an exact
    /// element. The related column is unindexed, so this is a full scan;
    /// exact-element matching is done after JSON decode to rule out the
    /// substring false-positives a LIKE query would admit.
    pub fn reverse_related(&self, target_id: &str) -> Result<Vec<VideoRecord>, StoreError> {
        let sql = format!("SELECT {} FROM videos ORDER BY id ASC", RECORD_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_record)?;
        let mut matches = Vec::new();
        for row in rows {
            let record = row?;
            if record.related.iter().any(|r| r == target_id) {
                matches.push(record);
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VideoStore;
    use tempfile::tempdir;

    fn record(video_id: &str, uploader: &str, category: &str, related: &[&str]) -> VideoRecord {
        VideoRecord {
            video_id: video_id.to_string(),
            uploader: uploader.to_string(),
            category: category.to_string(),
            duration: Some(100),
            views: Some(500),
            rating: Some(3.5),
            related: related.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn seeded_db(records: &[VideoRecord]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let mut store = VideoStore::open(&db_path).unwrap();
        store.insert_batch(records).unwrap();
        (dir, db_path)
    }

    #[test]
    fn test_total_count() {
        let (_dir, db_path) = seeded_db(&[
            record("v1", "a", "Music", &[]),
            record("v2", "b", "Comedy", &[]),
        ]);
        let queries = VideoQueries::open(&db_path).unwrap();
        assert_eq!(queries.total_count().unwrap(), 2);
    }

    #[test]
    fn test_top_categories_descending_with_stable_ties() {
        // Music first (3), then Comedy and Sports tied at 2: Comedy was
        // inserted first, so it precedes Sports, on every run.
        let (_dir, db_path) = seeded_db(&[
            record("v1", "a", "Comedy", &[]),
            record("v2", "a", "Sports", &[]),
            record("v3", "a", "Music", &[]),
            record("v4", "a", "Music", &[]),
            record("v5", "a", "Comedy", &[]),
            record("v6", "a", "Sports", &[]),
            record("v7", "a", "Music", &[]),
        ]);
        let queries = VideoQueries::open(&db_path).unwrap();

        let top = queries.top_categories(10).unwrap();
        assert_eq!(
            top,
            vec![
                CategoryCount { category: "Music".to_string(), count: 3 },
                CategoryCount { category: "Comedy".to_string(), count: 2 },
                CategoryCount { category: "Sports".to_string(), count: 2 },
            ]
        );

        // Repeated query, identical ordering
        assert_eq!(queries.top_categories(10).unwrap(), top);

        // Truncation
        assert_eq!(queries.top_categories(1).unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_id_first_match_policy() {
        let mut first = record("dup", "first_uploader", "Music", &[]);
        first.views = Some(111);
        let mut second = record("dup", "second_uploader", "Comedy", &[]);
        second.views = Some(222);

        let (_dir, db_path) = seeded_db(&[first.clone(), second]);
        let queries = VideoQueries::open(&db_path).unwrap();

        let found = queries.find_by_id("dup").unwrap().unwrap();
        assert_eq!(found, first);
        assert!(queries.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_find_by_uploader_exact_case_sensitive() {
        let (_dir, db_path) = seeded_db(&[
            record("v1", "alice", "Music", &[]),
            record("v2", "Alice", "Music", &[]),
            record("v3", "alice", "Comedy", &[]),
        ]);
        let queries = VideoQueries::open(&db_path).unwrap();

        let found = queries.find_by_uploader("alice", 5).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|r| r.uploader == "alice"));

        // Limit respected
        assert_eq!(queries.find_by_uploader("alice", 1).unwrap().len(), 1);
        assert!(queries.find_by_uploader("bob", 5).unwrap().is_empty());
    }

    #[test]
    fn test_reverse_related_exact_element_only() {
        let (_dir, db_path) = seeded_db(&[
            record("v1", "a", "Music", &["target", "other"]),
            record("v2", "a", "Music", &["target_longer"]),
            record("v3", "a", "Music", &["tar"]),
            record("v4", "a", "Music", &["x", "target"]),
            record("v5", "a", "Music", &[]),
        ]);
        let queries = VideoQueries::open(&db_path).unwrap();

        let pointing = queries.reverse_related("target").unwrap();
        let ids: Vec<&str> = pointing.iter().map(|r| r.video_id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v4"]);
    }

    #[test]
    fn test_reverse_related_dangling_target() {
        // The target id need not exist as a record itself.
        let (_dir, db_path) = seeded_db(&[record("v1", "a", "Music", &["ghost"])]);
        let queries = VideoQueries::open(&db_path).unwrap();
        assert_eq!(queries.reverse_related("ghost").unwrap().len(), 1);
    }

    #[test]
    fn test_query_handle_is_read_only() {
        let (_dir, db_path) = seeded_db(&[record("v1", "a", "Music", &[])]);
        let queries = VideoQueries::open(&db_path).unwrap();
        let result = queries.conn.execute("DELETE FROM videos", []);
        assert!(result.is_err());
    }
}
