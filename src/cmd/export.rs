use crate::export::export_csv;
use std::path::PathBuf;

pub fn run(database: PathBuf, output: PathBuf, json: bool) -> anyhow::Result<()> {
    if !database.exists() {
        anyhow::bail!("database file does not exist: {}", database.display());
    }

    if !json {
        println!(
            "Exporting tables from {} to {}",
            database.display(),
            output.display()
        );
    }

    let stats = export_csv(&database, &output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n✓ Export completed!");
    println!("\nStatistics:");
    println!("  Files written: {}", stats.files_written);
    println!("  Rows written: {}", stats.rows_written);
    for table in &stats.tables {
        println!("  - {}.csv", table);
    }

    Ok(())
}
