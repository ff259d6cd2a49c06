use duckdb::Connection;
use sql_seeder::generator::{Dialect, GeneratorConfig, ScriptGenerator};
use sql_seeder::loader::Loader;
use tempfile::TempDir;

fn small_duckdb_script() -> Vec<u8> {
    let config = GeneratorConfig {
        dialect: Dialect::DuckDb,
        database: "company_db".to_string(),
        employees: 10,
        projects: 5,
        projects_per_employee: 3,
        attendance_from: "2024-01-01".to_string(),
        attendance_to: "2024-01-03".to_string(),
        batch_size: 4,
        ..Default::default()
    };
    let mut out = Vec::new();
    ScriptGenerator::new(config)
        .unwrap()
        .generate(&mut out)
        .unwrap();
    out
}

fn count_rows(db: &std::path::Path, table: &str) -> i64 {
    let conn = Connection::open(db).unwrap();
    conn.query_row(&format!("SELECT count(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_load_generated_script() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("seed.sql");
    let data_dir = temp_dir.path().join("data");
    std::fs::write(&script_path, small_duckdb_script()).unwrap();

    let stats = Loader::new(script_path, data_dir.clone()).load().unwrap();

    assert_eq!(stats.database, "company_db");
    assert_eq!(stats.statements_failed, 0, "failures: {:?}", stats.warnings);
    // CREATE DATABASE + USE, plus one START TRANSACTION / COMMIT pair
    // per table, are handled by the loader rather than executed
    assert_eq!(stats.statements_skipped, 2 + 11 * 2);

    let db = data_dir.join("company_db.duckdb");
    assert!(db.exists());
    assert_eq!(count_rows(&db, "departments"), 8);
    assert_eq!(count_rows(&db, "employees"), 10);
    assert_eq!(count_rows(&db, "projects"), 5);
    // 3 days x 10 employees
    assert_eq!(count_rows(&db, "attendance"), 30);
    // 12 months per employee
    assert_eq!(count_rows(&db, "payroll"), 120);
}

#[test]
fn test_default_dialect_script_loads_cleanly() {
    use sql_seeder::generator::Enumerations;

    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("default.sql");
    let data_dir = temp_dir.path().join("data");

    // No dialect override: whatever the generator emits by default must
    // execute on the bundled engine, quotes included
    let mut enums = Enumerations::default();
    enums.departments.push("O'Brien & Co".to_string());
    let config = GeneratorConfig {
        database: "default_db".to_string(),
        employees: 5,
        projects: 3,
        projects_per_employee: 2,
        attendance_from: "2024-01-01".to_string(),
        attendance_to: "2024-01-02".to_string(),
        enums,
        ..Default::default()
    };
    let mut script = Vec::new();
    ScriptGenerator::new(config)
        .unwrap()
        .generate(&mut script)
        .unwrap();
    std::fs::write(&script_path, script).unwrap();

    let stats = Loader::new(script_path, data_dir.clone()).load().unwrap();
    assert_eq!(stats.statements_failed, 0, "failures: {:?}", stats.warnings);

    let db = data_dir.join("default_db.duckdb");
    assert_eq!(count_rows(&db, "departments"), 9);
}

#[test]
fn test_missing_directive_is_an_error_and_nothing_is_written() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("headless.sql");
    let data_dir = temp_dir.path().join("data");
    std::fs::write(
        &script_path,
        "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\n",
    )
    .unwrap();

    let result = Loader::new(script_path, data_dir.clone()).load();

    let err = result.unwrap_err().to_string();
    assert!(err.contains("No CREATE DATABASE or USE directive"), "{}", err);
    assert!(!data_dir.exists());
}

#[test]
fn test_failed_statement_does_not_abort_the_load() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("tolerant.sql");
    let data_dir = temp_dir.path().join("data");
    std::fs::write(
        &script_path,
        "CREATE DATABASE IF NOT EXISTS tolerant_db;\nUSE tolerant_db;\n\
         CREATE TABLE t (id INT);\n\
         START TRANSACTION;\n\
         INSERT INTO t VALUES (1);\n\
         INSERT INTO missing_table VALUES (2);\n\
         INSERT INTO t VALUES (3);\n\
         COMMIT;\n",
    )
    .unwrap();

    let stats = Loader::new(script_path, data_dir.clone()).load().unwrap();

    assert_eq!(stats.statements_failed, 1);
    assert_eq!(stats.warnings.len(), 1);
    assert!(stats.warnings[0].contains("missing_table"));

    // The rows around the failure made it in
    let db = data_dir.join("tolerant_db.duckdb");
    assert_eq!(count_rows(&db, "t"), 2);
}

#[test]
fn test_dangling_transaction_is_committed() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("truncated.sql");
    let data_dir = temp_dir.path().join("data");
    std::fs::write(
        &script_path,
        "USE truncated_db;\n\
         CREATE TABLE t (id INT);\n\
         START TRANSACTION;\n\
         INSERT INTO t VALUES (1);\n\
         INSERT INTO t VALUES (2);\n",
    )
    .unwrap();

    let stats = Loader::new(script_path, data_dir.clone()).load().unwrap();
    assert_eq!(stats.statements_failed, 0, "failures: {:?}", stats.warnings);

    let db = data_dir.join("truncated_db.duckdb");
    assert_eq!(count_rows(&db, "t"), 2);
}

#[test]
fn test_reload_recreates_the_database() {
    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("seed.sql");
    let data_dir = temp_dir.path().join("data");
    std::fs::write(&script_path, small_duckdb_script()).unwrap();

    Loader::new(script_path.clone(), data_dir.clone())
        .load()
        .unwrap();
    let stats = Loader::new(script_path, data_dir.clone()).load().unwrap();

    // Second run starts from an empty file: no duplicate-key failures,
    // and row counts stay at one script's worth
    assert_eq!(stats.statements_failed, 0, "failures: {:?}", stats.warnings);
    let db = data_dir.join("company_db.duckdb");
    assert_eq!(count_rows(&db, "employees"), 10);
}

#[test]
fn test_gzip_compressed_input() {
    use flate2::write::GzEncoder;
    use std::io::Write;

    let temp_dir = TempDir::new().unwrap();
    let script_path = temp_dir.path().join("seed.sql.gz");
    let data_dir = temp_dir.path().join("data");

    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&small_duckdb_script()).unwrap();
    std::fs::write(&script_path, encoder.finish().unwrap()).unwrap();

    let stats = Loader::new(script_path, data_dir.clone()).load().unwrap();

    assert_eq!(stats.statements_failed, 0, "failures: {:?}", stats.warnings);
    let db = data_dir.join("company_db.duckdb");
    assert_eq!(count_rows(&db, "employees"), 10);
}
