mod export;
mod generate;
mod load;
mod workbook;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-seeder")]
#[command(version)]
#[command(
    about = "Generate, load and export large synthetic SQL datasets",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a batched multi-row INSERT seed script
    Generate {
        /// Output SQL file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML config file overriding the generator defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of employee rows
        #[arg(long)]
        employees: Option<usize>,

        /// Number of project rows
        #[arg(long)]
        projects: Option<usize>,

        /// Value tuples per INSERT statement
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Database name used in the script header
        #[arg(long)]
        database: Option<String>,

        /// Target SQL dialect: mysql, postgres, sqlite, duckdb
        #[arg(short, long)]
        dialect: Option<String>,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Output statistics as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Load a SQL script into an embedded DuckDB database
    Load {
        /// Input SQL file (supports .gz, .bz2, .xz, .zst compression)
        file: PathBuf,

        /// Directory holding the database files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Keep an existing database file instead of recreating it
        #[arg(long)]
        keep_existing: bool,

        /// Show progress during loading
        #[arg(short, long)]
        progress: bool,

        /// Print every statement failure instead of a summary count
        #[arg(short, long)]
        verbose: bool,

        /// Output statistics as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Export every table of a database to per-table CSV files
    Export {
        /// DuckDB database file
        database: PathBuf,

        /// Output directory for CSV files
        #[arg(short, long, default_value = "csv_output")]
        output: PathBuf,

        /// Output statistics as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Build an XLSX workbook from a database or a directory of CSV files
    Workbook {
        /// DuckDB database file, or a directory of CSV files
        input: PathBuf,

        /// Output workbook path
        #[arg(short, long, default_value = "export.xlsx")]
        output: PathBuf,

        /// Output statistics as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            output,
            config,
            employees,
            projects,
            batch_size,
            seed,
            database,
            dialect,
            progress,
            json,
        } => generate::run(
            output, config, employees, projects, batch_size, seed, database, dialect, progress,
            json,
        ),
        Commands::Load {
            file,
            data_dir,
            keep_existing,
            progress,
            verbose,
            json,
        } => load::run(file, data_dir, keep_existing, progress, verbose, json),
        Commands::Export {
            database,
            output,
            json,
        } => export::run(database, output, json),
        Commands::Workbook {
            input,
            output,
            json,
        } => workbook::run(input, output, json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sql-seeder", &mut io::stdout());
            Ok(())
        }
    }
}
