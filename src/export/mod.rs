//! Exporters from a loaded DuckDB database to CSV files and XLSX workbooks.

pub mod csv;
pub mod workbook;

pub use csv::{export_csv, CsvExportStats};
pub use workbook::{export_workbook, workbook_from_csv_dir, WorkbookStats};

use anyhow::{Context, Result};
use duckdb::types::ValueRef;
use duckdb::Connection;

/// User tables in the database, alphabetical.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' ORDER BY table_name",
        )
        .context("Failed to query table list")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

/// One fully materialized table.
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read an entire table, rendering every value to a display string.
pub fn fetch_table(conn: &Connection, table: &str) -> Result<TableData> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM \"{}\"", table))
        .with_context(|| format!("Failed to prepare select for table: {}", table))?;

    let mut rows_result = stmt
        .query([])
        .with_context(|| format!("Failed to read table: {}", table))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut column_count = 0;

    while let Some(row) = rows_result.next()? {
        if column_count == 0 {
            column_count = row.as_ref().column_count();
        }
        let mut values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            values.push(match row.get_ref(i) {
                Ok(value) => render_value(value),
                Err(_) => String::new(),
            });
        }
        rows.push(values);
    }
    drop(rows_result);

    let column_count = stmt.column_count();
    let columns: Vec<String> = (0..column_count)
        .map(|i| {
            stmt.column_name(i)
                .map(|s| s.to_string())
                .unwrap_or_else(|_| format!("col{}", i))
        })
        .collect();

    Ok(TableData { columns, rows })
}

/// Render one cell value to its export string. NULL becomes an empty cell.
fn render_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Boolean(b) => b.to_string(),
        ValueRef::TinyInt(n) => n.to_string(),
        ValueRef::SmallInt(n) => n.to_string(),
        ValueRef::Int(n) => n.to_string(),
        ValueRef::BigInt(n) => n.to_string(),
        ValueRef::HugeInt(n) => n.to_string(),
        ValueRef::UTinyInt(n) => n.to_string(),
        ValueRef::USmallInt(n) => n.to_string(),
        ValueRef::UInt(n) => n.to_string(),
        ValueRef::UBigInt(n) => n.to_string(),
        ValueRef::Float(f) => f.to_string(),
        ValueRef::Double(f) => f.to_string(),
        ValueRef::Decimal(d) => d.to_string(),
        ValueRef::Text(s) => String::from_utf8_lossy(s).to_string(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
        ValueRef::Timestamp(_, ts) => {
            // Microseconds since epoch
            let secs = ts / 1_000_000;
            let nanos = ((ts % 1_000_000) * 1000) as u32;
            match chrono::DateTime::from_timestamp(secs, nanos) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => ts.to_string(),
            }
        }
        ValueRef::Date32(days) => {
            // 719163 = days from 0001-01-01 to 1970-01-01
            match chrono::NaiveDate::from_num_days_from_ce_opt(719163 + days) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => days.to_string(),
            }
        }
        ValueRef::Time64(_, micros) => {
            let secs = (micros / 1_000_000) as u32;
            let nanos = ((micros % 1_000_000) * 1000) as u32;
            match chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
                Some(time) => time.format("%H:%M:%S").to_string(),
                None => micros.to_string(),
            }
        }
        other => format!("{:?}", other),
    }
}
