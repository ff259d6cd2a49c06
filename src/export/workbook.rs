//! XLSX workbook export.
//!
//! Excel caps a worksheet at 1,048,576 rows. One row is reserved for the
//! header, and tables larger than the remaining capacity are split across
//! `<table>_part1`, `<table>_part2`, ... sheets. Sheet names are clipped to
//! the 31-character limit.

use super::{fetch_table, list_tables, TableData};
use anyhow::{Context, Result};
use duckdb::Connection;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;
use std::path::Path;

/// Hard Excel worksheet row limit.
pub const MAX_SHEET_ROWS: usize = 1_048_576;
/// Hard Excel sheet name limit.
const SHEET_NAME_LIMIT: usize = 31;
/// Widest a column is allowed to autofit.
const MAX_COLUMN_WIDTH: f64 = 50.0;

#[derive(Debug, Clone, Serialize, Default)]
pub struct WorkbookStats {
    pub tables: usize,
    pub sheets: usize,
    pub rows_written: u64,
}

/// Data rows that fit on one sheet below the header.
pub fn sheet_capacity() -> usize {
    MAX_SHEET_ROWS - 1
}

/// Worksheet name for one chunk of a table, within Excel's length limit.
fn sheet_name(base: &str, part: usize, multi_part: bool) -> String {
    if !multi_part {
        return base.chars().take(SHEET_NAME_LIMIT).collect();
    }
    let suffix = format!("_part{}", part + 1);
    let keep = SHEET_NAME_LIMIT.saturating_sub(suffix.len());
    let mut name: String = base.chars().take(keep).collect();
    name.push_str(&suffix);
    name
}

/// Export every table of the database into one workbook.
pub fn export_workbook(db_path: &Path, output: &Path) -> Result<WorkbookStats> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    let mut workbook = Workbook::new();
    let mut stats = WorkbookStats::default();

    for table in list_tables(&conn)? {
        let data = fetch_table(&conn, &table)?;
        stats.sheets += write_table(&mut workbook, &table, &data)?;
        stats.rows_written += data.rows.len() as u64;
        stats.tables += 1;
    }

    workbook
        .save(output)
        .with_context(|| format!("Failed to save workbook: {}", output.display()))?;
    Ok(stats)
}

/// Build a workbook from a directory of CSV files, one sheet set per file.
pub fn workbook_from_csv_dir(csv_dir: &Path, output: &Path) -> Result<WorkbookStats> {
    let mut csv_files: Vec<_> = std::fs::read_dir(csv_dir)
        .with_context(|| format!("Failed to read directory: {}", csv_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    csv_files.sort();

    let mut workbook = Workbook::new();
    let mut stats = WorkbookStats::default();

    for path in csv_files {
        let table = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sheet")
            .to_string();

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();
        let rows: Vec<Vec<String>> = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect();

        let data = TableData { columns, rows };
        stats.sheets += write_table(&mut workbook, &table, &data)?;
        stats.rows_written += data.rows.len() as u64;
        stats.tables += 1;
    }

    workbook
        .save(output)
        .with_context(|| format!("Failed to save workbook: {}", output.display()))?;
    Ok(stats)
}

/// Write one table, chunked across as many sheets as its row count needs.
/// Returns the number of sheets written.
fn write_table(workbook: &mut Workbook, table: &str, data: &TableData) -> Result<usize> {
    let capacity = sheet_capacity();
    let chunks: Vec<&[Vec<String>]> = if data.rows.is_empty() {
        vec![&[]]
    } else {
        data.rows.chunks(capacity).collect()
    };
    let multi_part = chunks.len() > 1;

    for (part, chunk) in chunks.iter().enumerate() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(table, part, multi_part))?;
        write_sheet(sheet, &data.columns, chunk)?;
    }

    Ok(chunks.len())
}

fn write_sheet(sheet: &mut Worksheet, columns: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }

    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(value.chars().count());
            }
            match numeric_cell(value) {
                Some(n) => sheet.write_number(i as u32 + 1, col as u16, n)?,
                None => sheet.write_string(i as u32 + 1, col as u16, value)?,
            };
        }
    }

    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, ((*width + 2) as f64).min(MAX_COLUMN_WIDTH))?;
    }

    Ok(())
}

/// Parse a value that should land in Excel as a number.
///
/// Conservative on purpose: anything whose text form would change (leading
/// zeros, phone numbers) stays a string.
fn numeric_cell(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.parse::<i64>() {
        if n.to_string() == value {
            return Some(n as f64);
        }
        return None;
    }
    if value.contains('.') {
        if let Ok(f) = value.parse::<f64>() {
            return Some(f);
        }
    }
    None
}
