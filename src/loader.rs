//! Replace-load protocol: clear the store, then bulk-insert normalized files
//!
//! The clear and the reload are not atomic. A reader between them sees an
//! empty or partially loaded table; the only guarantee is that the final
//! state is correct once the load completes. A crash mid-load leaves the
//! store empty or partial with no automatic recovery: re-run the load.

use crate::record::VideoRecord;
use crate::store::{StoreError, VideoStore};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug)]
pub enum LoaderError {
    UnreadablePath(PathBuf, std::io::Error),
    NoInputFiles(PathBuf),
    Store(StoreError),
}

impl From<StoreError> for LoaderError {
    fn from(err: StoreError) -> Self {
        LoaderError::Store(err)
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::UnreadablePath(path, e) => {
                write!(f, "Cannot read input path {}: {}", path.display(), e)
            }
            LoaderError::NoInputFiles(path) => {
                write!(f, "No input files found in {}", path.display())
            }
            LoaderError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for LoaderError {}

/// Outcome of loading one normalized file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub inserted: usize,
    pub skipped: usize,
    pub elapsed_secs: f64,
}

/// Outcome of a whole replace-load run.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub files: Vec<FileReport>,
    pub total_inserted: usize,
    pub total_skipped: usize,
    /// Re-queried store count after all files were processed. Observational
    /// verification only.
    pub final_count: i64,
}

/// Replace-loader over an explicitly passed store handle.
pub struct BatchLoader<'a> {
    store: &'a mut VideoStore,
}

impl<'a> BatchLoader<'a> {
    pub fn new(store: &'a mut VideoStore) -> Self {
        Self { store }
    }

    /// Clear the store, then load `input` (a normalized JSONL file, or a
    /// directory whose regular files are loaded in file-name order).
    ///
    /// Memory use is proportional to one file's record count at a time:
    /// each file is accumulated and inserted in a single bulk transaction,
    /// so a very large single file is a known scaling limit.
    pub fn replace_load(&mut self, input: impl AsRef<Path>) -> Result<LoadReport, LoaderError> {
        let files = collect_input_files(input.as_ref())?;

        self.store.clear_all()?;

        let mut report = LoadReport::default();
        for file in files {
            let file_report = self.load_file(&file)?;
            report.total_inserted += file_report.inserted;
            report.total_skipped += file_report.skipped;
            report.files.push(file_report);
        }

        report.final_count = self.store.total_count()?;
        log::info!("📊 Store now holds {} records", report.final_count);
        Ok(report)
    }

    fn load_file(&mut self, path: &Path) -> Result<FileReport, LoaderError> {
        let file =
            fs::File::open(path).map_err(|e| LoaderError::UnreadablePath(path.to_path_buf(), e))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| LoaderError::UnreadablePath(path.to_path_buf(), e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match VideoRecord::from_jsonl(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    log::warn!(
                        "⚠️ {}:{}: skipping malformed line: {}",
                        path.display(),
                        line_no + 1,
                        e
                    );
                }
            }
        }

        if records.is_empty() {
            log::warn!("⚠️ No valid records found in {}", path.display());
            return Ok(FileReport {
                path: path.to_path_buf(),
                inserted: 0,
                skipped,
                elapsed_secs: 0.0,
            });
        }

        let start = Instant::now();
        let inserted = self.store.insert_batch(&records)?;
        let elapsed_secs = start.elapsed().as_secs_f64();
        log::info!(
            "✅ Inserted {} records from {} in {:.4}s ({} malformed lines skipped)",
            inserted,
            path.display(),
            elapsed_secs,
            skipped
        );

        Ok(FileReport {
            path: path.to_path_buf(),
            inserted,
            skipped,
            elapsed_secs,
        })
    }
}

/// Expand the input path into an ordered list of files to load.
///
/// Directories are enumerated in file-name order so rowid insertion order,
/// and with it the first-match and tie-break query results, is reproducible
/// across runs.
fn collect_input_files(input: &Path) -> Result<Vec<PathBuf>, LoaderError> {
    let meta =
        fs::metadata(input).map_err(|e| LoaderError::UnreadablePath(input.to_path_buf(), e))?;
    if !meta.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let entries =
        fs::read_dir(input).map_err(|e| LoaderError::UnreadablePath(input.to_path_buf(), e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(LoaderError::NoInputFiles(input.to_path_buf()));
    }
    Ok(files)
}
