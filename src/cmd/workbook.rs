use crate::export::{export_workbook, workbook_from_csv_dir};
use std::path::PathBuf;

pub fn run(input: PathBuf, output: PathBuf, json: bool) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("input does not exist: {}", input.display());
    }

    if !json {
        println!(
            "Building workbook {} from {}",
            output.display(),
            input.display()
        );
    }

    let stats = if input.is_dir() {
        workbook_from_csv_dir(&input, &output)?
    } else {
        export_workbook(&input, &output)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n✓ Workbook written!");
    println!("\nStatistics:");
    println!("  Tables: {}", stats.tables);
    println!("  Sheets: {}", stats.sheets);
    println!("  Rows written: {}", stats.rows_written);

    Ok(())
}
