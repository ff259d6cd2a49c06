//! Per-table CSV export.

use super::{fetch_table, list_tables};
use anyhow::{Context, Result};
use duckdb::Connection;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Default)]
pub struct CsvExportStats {
    pub files_written: usize,
    pub rows_written: u64,
    pub tables: Vec<String>,
}

/// Write every table of the database to `<out_dir>/<table>.csv`.
pub fn export_csv(db_path: &Path, out_dir: &Path) -> Result<CsvExportStats> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut stats = CsvExportStats::default();

    for table in list_tables(&conn)? {
        let data = fetch_table(&conn, &table)?;
        let path = out_dir.join(format!("{}.csv", table));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        writer.write_record(&data.columns)?;
        for row in &data.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        stats.files_written += 1;
        stats.rows_written += data.rows.len() as u64;
        stats.tables.push(table);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_one_file_per_table() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.duckdb");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "CREATE TABLE employees (empID INT, employee_name VARCHAR);\n\
             INSERT INTO employees VALUES (1, 'Alice'), (2, 'Bob, Jr.');\n\
             CREATE TABLE departments (department_id INT, department_name VARCHAR);\n\
             INSERT INTO departments VALUES (1, 'IT');",
        )
        .unwrap();
        drop(conn);

        let out = dir.path().join("csv");
        let stats = export_csv(&db_path, &out).unwrap();

        assert_eq!(stats.files_written, 2);
        assert_eq!(stats.rows_written, 3);
        assert!(out.join("employees.csv").exists());
        assert!(out.join("departments.csv").exists());

        // Commas inside values stay quoted
        let content = std::fs::read_to_string(out.join("employees.csv")).unwrap();
        assert!(content.starts_with("empID,employee_name\n"));
        assert!(content.contains("\"Bob, Jr.\""));
    }
}
