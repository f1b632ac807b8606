//! pubdedup - deduplicate and clean bibliographic publication tables.
//!
//! One subcommand per pipeline step:
//!
//! ```bash
//! pubdedup dedupe --csv publications.csv --originals originals.csv --duplicates duplicates.csv
//! pubdedup clean --input publications.csv --output cleaned.csv
//! pubdedup unique --input publications.csv --output unique.csv --column id
//! pubdedup merge-scimago --data-dir data --output scimago.csv
//! pubdedup merge-core --data-dir data --output core.csv
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pubdedup::{
    DedupeConfig, Deduplicator, Table, keep_first_by, rankings, strip_escaped_rows,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Deduplicate, clean, and rank-merge bibliographic publication tables
#[derive(Parser)]
#[command(name = "pubdedup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate publications by DOI, MAG, and fuzzy title
    Dedupe {
        /// Input CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Output CSV for originals
        #[arg(long)]
        originals: PathBuf,

        /// Output CSV for duplicates (with removal flags)
        #[arg(long)]
        duplicates: PathBuf,

        /// Title similarity threshold (0-100)
        #[arg(long, default_value_t = 95.0)]
        threshold: f64,

        /// Blocking prefix length in characters
        #[arg(long, default_value_t = 4)]
        block_prefix: usize,

        /// Compute per-block similarity scores in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Remove rows containing HTML-escape artifacts in any column
    Clean {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Output CSV file
        #[arg(long)]
        output: PathBuf,
    },

    /// Keep the first row per value of a column, drop later duplicates
    Unique {
        /// Input CSV file
        #[arg(long)]
        input: PathBuf,

        /// Output CSV file
        #[arg(long)]
        output: PathBuf,

        /// Column name to check for uniqueness
        #[arg(long)]
        column: String,
    },

    /// Merge per-year SCImago journal ranking files into one CSV
    MergeScimago {
        /// Directory containing SCImago CSV files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// File name prefix of the per-year files
        #[arg(long, default_value = "scimagojr")]
        prefix: String,

        /// Output CSV file
        #[arg(long)]
        output: PathBuf,
    },

    /// Merge per-year CORE conference ranking files into one CSV
    MergeCore {
        /// Directory containing CORE CSV files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// File name prefix of the per-year files
        #[arg(long, default_value = "CORE_")]
        prefix: String,

        /// Output CSV file
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Dedupe {
            csv,
            originals,
            duplicates,
            threshold,
            block_prefix,
            parallel,
        } => {
            let table = Table::read_path(&csv)
                .with_context(|| format!("failed to read {}", csv.display()))?;

            let config = DedupeConfig {
                title_similarity_threshold: threshold,
                block_prefix_len: block_prefix,
                run_in_parallel: parallel,
            };
            let result = Deduplicator::new().with_config(config).split(&table)?;

            result
                .originals
                .write_path(&originals)
                .with_context(|| format!("failed to write {}", originals.display()))?;
            result
                .duplicates
                .write_path(&duplicates)
                .with_context(|| format!("failed to write {}", duplicates.display()))?;

            println!(
                "Saved {} originals to {} and {} duplicates to {}",
                result.stats.originals,
                originals.display(),
                result.stats.duplicates,
                duplicates.display()
            );
        }

        Commands::Clean { input, output } => {
            let table = Table::read_path(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let (cleaned, stats) = strip_escaped_rows(&table);
            cleaned
                .write_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Processed {} rows. Written: {}, Removed: {}",
                stats.read, stats.kept, stats.removed
            );
        }

        Commands::Unique {
            input,
            output,
            column,
        } => {
            let table = Table::read_path(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let (unique, dropped) = keep_first_by(&table, &column)?;
            unique
                .write_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Kept {} rows, dropped {} duplicates of `{}`", unique.len(), dropped, column);
        }

        Commands::MergeScimago {
            data_dir,
            prefix,
            output,
        } => {
            let files = rankings::discover_year_files(&data_dir, &prefix)
                .with_context(|| format!("failed to scan {}", data_dir.display()))?;
            if files.is_empty() {
                bail!("no {}*.csv files found in {}", prefix, data_dir.display());
            }
            let merged = rankings::merge_scimago(&files)?;
            merged
                .write_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Written merged CSV to {}", output.display());
        }

        Commands::MergeCore {
            data_dir,
            prefix,
            output,
        } => {
            let files = rankings::discover_year_files(&data_dir, &prefix)
                .with_context(|| format!("failed to scan {}", data_dir.display()))?;
            if files.is_empty() {
                bail!("no {}*.csv files found in {}", prefix, data_dir.display());
            }
            let merged = rankings::merge_core(&files)?;
            merged
                .write_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Written merged CSV to {}", output.display());
        }
    }

    Ok(())
}
