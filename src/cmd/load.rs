use crate::loader::{Compression, Loader};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

pub fn run(
    file: PathBuf,
    data_dir: PathBuf,
    keep_existing: bool,
    progress: bool,
    verbose: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("input file does not exist: {}", file.display());
    }

    let file_size = std::fs::metadata(&file)?.len();
    let compression = Compression::from_path(&file);

    if !json {
        println!(
            "Loading SQL script: {} ({:.2} MB)",
            file.display(),
            file_size as f64 / (1024.0 * 1024.0)
        );
        if compression != Compression::None {
            println!("Detected compression: {}", compression);
        }
        println!();
    }

    let mut loader = Loader::new(file, data_dir).with_keep_existing(keep_existing);

    let progress_bar = if progress && !json {
        let pb = ProgressBar::new(file_size);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
            )
            .unwrap()
            .progress_chars("=>-"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let pb_clone = pb.clone();
        loader = loader.with_progress(move |bytes| {
            pb_clone.set_position(bytes);
        });
        Some(pb)
    } else {
        None
    };

    let stats = loader.load()?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n✓ Load completed!");
    println!("\nStatistics:");
    println!("  Database: {} ({})", stats.database, stats.database_path);
    println!("  Statements executed: {}", stats.statements_executed);
    println!("  Statements skipped: {}", stats.statements_skipped);
    println!("  Statements failed: {}", stats.statements_failed);
    println!(
        "  Bytes processed: {:.2} MB",
        stats.bytes_processed as f64 / (1024.0 * 1024.0)
    );
    println!("  Elapsed time: {:.3}s", stats.duration_secs);

    if !stats.warnings.is_empty() {
        if verbose {
            println!("\nFailures:");
            for warning in &stats.warnings {
                println!("  - {}", warning);
            }
        } else {
            println!(
                "\n{} statement(s) failed; rerun with --verbose to see them",
                stats.statements_failed
            );
        }
    }

    Ok(())
}
