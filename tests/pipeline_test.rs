//! End-to-end run: generate a script, load it, export CSVs, build a workbook.

use sql_seeder::export::{export_csv, export_workbook, workbook_from_csv_dir};
use sql_seeder::generator::{Dialect, GeneratorConfig, ScriptGenerator};
use sql_seeder::loader::Loader;
use tempfile::TempDir;

#[test]
fn test_generate_load_export_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("seed.sql");
    let data_dir = temp_dir.path().join("data");
    let csv_dir = temp_dir.path().join("csv");

    let config = GeneratorConfig {
        dialect: Dialect::DuckDb,
        database: "pipeline_db".to_string(),
        employees: 6,
        projects: 4,
        projects_per_employee: 2,
        attendance_from: "2024-02-01".to_string(),
        attendance_to: "2024-02-02".to_string(),
        batch_size: 3,
        ..Default::default()
    };

    let mut script = Vec::new();
    ScriptGenerator::new(config)
        .unwrap()
        .generate(&mut script)
        .unwrap();
    std::fs::write(&script_path, script).unwrap();

    let load_stats = Loader::new(script_path, data_dir.clone()).load().unwrap();
    assert_eq!(
        load_stats.statements_failed, 0,
        "failures: {:?}",
        load_stats.warnings
    );

    let db = data_dir.join("pipeline_db.duckdb");
    let csv_stats = export_csv(&db, &csv_dir).unwrap();
    assert_eq!(csv_stats.files_written, 11);

    // employees.csv carries a header plus one line per employee
    let employees_csv = std::fs::read_to_string(csv_dir.join("employees.csv")).unwrap();
    assert_eq!(employees_csv.lines().count(), 7);
    assert!(employees_csv.starts_with("empID,"));

    let from_db = temp_dir.path().join("from_db.xlsx");
    let db_stats = export_workbook(&db, &from_db).unwrap();
    assert_eq!(db_stats.tables, 11);
    assert!(from_db.exists());

    let from_csv = temp_dir.path().join("from_csv.xlsx");
    let csv_wb_stats = workbook_from_csv_dir(&csv_dir, &from_csv).unwrap();
    assert_eq!(csv_wb_stats.tables, 11);
    assert_eq!(csv_wb_stats.rows_written, db_stats.rows_written);
    assert!(from_csv.exists());
}
