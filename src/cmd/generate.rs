use crate::generator::{GenerateStats, GeneratorConfig, ScriptGenerator, TABLE_ORDER};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Serialize)]
pub(crate) struct GenerateJsonOutput {
    output: String,
    database: String,
    dialect: String,
    seed: u64,
    batch_size: usize,
    statistics: GenerateStatistics,
}

#[derive(Serialize)]
pub(crate) struct GenerateStatistics {
    total_rows: u64,
    bytes_written: u64,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    throughput_mb_per_sec: Option<f64>,
    tables: Vec<crate::generator::TableStats>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    employees: Option<usize>,
    projects: Option<usize>,
    batch_size: Option<usize>,
    seed: Option<u64>,
    database: Option<String>,
    dialect: Option<String>,
    progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(ref path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(n) = employees {
        config.employees = n;
    }
    if let Some(n) = projects {
        config.projects = n;
    }
    if let Some(n) = batch_size {
        config.batch_size = n;
    }
    if let Some(s) = seed {
        config.seed = s;
    }
    if let Some(db) = database {
        config.database = db;
    }
    if let Some(d) = dialect {
        config.dialect = d.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    config.validate()?;

    let output_label = output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdout>".to_string());

    if !json && output.is_some() {
        println!(
            "Generating seed script for database '{}' ({} employees, {} projects)",
            config.database, config.employees, config.projects
        );
        println!("Output: {}\n", output_label);
    }

    let db_name = config.database.clone();
    let dialect_label = config.dialect.to_string();
    let seed_used = config.seed;
    let batch_used = config.batch_size;

    let mut generator = ScriptGenerator::new(config)?;

    let progress_bar = if progress && !json && output.is_some() {
        let pb = ProgressBar::new(TABLE_ORDER.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tables {msg}",
            )
            .unwrap()
            .progress_chars("=>-"),
        );
        let pb_clone = pb.clone();
        generator = generator.with_table_progress(move |table| {
            pb_clone.set_message(table.to_string());
            pb_clone.inc(1);
        });
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = match output {
        Some(ref path) => {
            let file = File::create(path)?;
            generator.generate(BufWriter::new(file))?
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            let stats = generator.generate(BufWriter::new(&mut lock))?;
            lock.flush()?;
            stats
        }
    };
    let elapsed = start.elapsed();

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    if json {
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            Some(stats.bytes_written as f64 / (1024.0 * 1024.0) / elapsed.as_secs_f64())
        } else {
            None
        };
        let output_json = GenerateJsonOutput {
            output: output_label,
            database: db_name,
            dialect: dialect_label,
            seed: seed_used,
            batch_size: batch_used,
            statistics: GenerateStatistics {
                total_rows: stats.total_rows(),
                bytes_written: stats.bytes_written,
                elapsed_secs: elapsed.as_secs_f64(),
                throughput_mb_per_sec: throughput,
                tables: stats.tables,
            },
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else if output.is_some() {
        println!("\n✓ Generation completed successfully!");
        println!("\nStatistics:");
        println!("  Total rows: {}", stats.total_rows());
        println!(
            "  Bytes written: {:.2} MB",
            stats.bytes_written as f64 / (1024.0 * 1024.0)
        );
        println!("  Elapsed time: {:.3?}", elapsed);
        println!("\nRows per table:");
        for table in &stats.tables {
            println!(
                "  {:<20} {:>10} rows in {} statements",
                table.table, table.rows, table.insert_statements
            );
        }
    }

    Ok(())
}
