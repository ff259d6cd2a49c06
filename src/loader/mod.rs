//! Script loader: replays a generated SQL script into an embedded DuckDB
//! database file.
//!
//! The target database is named by the script itself: the leading portion is
//! scanned for a `CREATE DATABASE IF NOT EXISTS` or `USE` directive and the
//! name maps to `<data-dir>/<name>.duckdb`. A script without either directive
//! is a configuration error and nothing is touched.
//!
//! Execution is tolerant: a failing statement is logged with a short preview
//! and the run continues, so one malformed INSERT never aborts a multi-hour
//! load. Transaction markers in the script are skipped rather than executed;
//! the embedded engine auto-commits each statement, which keeps a failure
//! from poisoning the statements around it and leaves nothing uncommitted
//! if the script is truncated.

pub mod compression;

pub use compression::Compression;

use crate::parser::{
    classify_statement, determine_buffer_size, extract_database_name, StatementKind,
    StatementReader, HEAD_SCAN_LIMIT,
};
use crate::progress::ProgressReader;
use anyhow::{bail, Context, Result};
use duckdb::Connection;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Maximum bytes of a failing statement quoted in the log.
const ERROR_PREVIEW_BYTES: usize = 300;

#[derive(Debug, Clone, Serialize, Default)]
pub struct LoadStats {
    pub database: String,
    pub database_path: String,
    pub statements_executed: u64,
    pub statements_failed: u64,
    pub statements_skipped: u64,
    pub bytes_processed: u64,
    pub duration_secs: f64,
    pub warnings: Vec<String>,
}

pub struct Loader {
    input_file: PathBuf,
    data_dir: PathBuf,
    drop_existing: bool,
    progress_fn: Option<Box<dyn Fn(u64)>>,
}

impl Loader {
    pub fn new(input_file: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            input_file,
            data_dir,
            drop_existing: true,
            progress_fn: None,
        }
    }

    /// Keep an existing database file instead of recreating it.
    pub fn with_keep_existing(mut self, keep: bool) -> Self {
        self.drop_existing = !keep;
        self
    }

    /// Callback invoked with cumulative compressed bytes read.
    pub fn with_progress<F: Fn(u64) + 'static>(mut self, f: F) -> Self {
        self.progress_fn = Some(Box::new(f));
        self
    }

    pub fn load(mut self) -> Result<LoadStats> {
        let start = std::time::Instant::now();

        // Resolve the target database before touching anything on disk.
        let database = self.scan_database_name()?;
        let db_path = self.data_dir.join(format!("{}.duckdb", database));

        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;

        if self.drop_existing {
            remove_if_exists(&db_path)?;
            remove_if_exists(&db_path.with_extension("duckdb.wal"))?;
        }

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        let mut stats = LoadStats {
            database,
            database_path: db_path.display().to_string(),
            ..Default::default()
        };

        let file = File::open(&self.input_file)
            .with_context(|| format!("Failed to open input file: {}", self.input_file.display()))?;
        let file_size = file.metadata()?.len();

        let raw: Box<dyn Read> = if let Some(progress_fn) = self.progress_fn.take() {
            Box::new(ProgressReader::new(file, move |bytes| progress_fn(bytes)))
        } else {
            Box::new(file)
        };
        let reader = Compression::from_path(&self.input_file).wrap_reader(raw)?;

        self.execute_script(&conn, reader, determine_buffer_size(file_size), &mut stats)?;

        stats.duration_secs = start.elapsed().as_secs_f64();
        Ok(stats)
    }

    /// Scan the leading bytes of the script for the database directive.
    fn scan_database_name(&self) -> Result<String> {
        let file = File::open(&self.input_file)
            .with_context(|| format!("Failed to open input file: {}", self.input_file.display()))?;
        let compression = Compression::from_path(&self.input_file);
        let reader = compression.wrap_reader(Box::new(file))?;

        let mut head = Vec::with_capacity(HEAD_SCAN_LIMIT.min(64 * 1024));
        reader
            .take(HEAD_SCAN_LIMIT as u64)
            .read_to_end(&mut head)
            .context("Failed to read script header")?;

        match extract_database_name(&String::from_utf8_lossy(&head)) {
            Some(name) => Ok(name),
            None => bail!(
                "No CREATE DATABASE or USE directive found in the first {} bytes of {}",
                HEAD_SCAN_LIMIT,
                self.input_file.display()
            ),
        }
    }

    fn execute_script<R: Read>(
        &self,
        conn: &Connection,
        reader: R,
        buffer_size: usize,
        stats: &mut LoadStats,
    ) -> Result<()> {
        let mut statements = StatementReader::new(reader, buffer_size);

        while let Some(stmt) = statements.read_statement()? {
            stats.bytes_processed += stmt.len() as u64;

            let sql = String::from_utf8_lossy(&stmt);
            let trimmed = sql.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (kind, _table) = classify_statement(&stmt);

            // Header directives and transaction markers are the script's
            // concern, not the engine's. Executing the markers would let one
            // bad INSERT abort the whole enclosing transaction.
            if kind.is_directive()
                || matches!(kind, StatementKind::Begin | StatementKind::Commit)
            {
                stats.statements_skipped += 1;
                continue;
            }

            match conn.execute_batch(trimmed) {
                Ok(_) => stats.statements_executed += 1,
                Err(e) => {
                    stats.statements_failed += 1;
                    if stats.warnings.len() < 100 {
                        stats
                            .warnings
                            .push(format!("{} -- while executing: {}", e, preview(trimmed)));
                    }
                }
            }
        }

        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove: {}", path.display())),
    }
}

/// Single-line preview of a failing statement for the log.
fn preview(stmt: &str) -> String {
    let mut line: String = stmt
        .chars()
        .take(ERROR_PREVIEW_BYTES)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if stmt.chars().count() > ERROR_PREVIEW_BYTES {
        line.push_str("...");
    }
    line
}
