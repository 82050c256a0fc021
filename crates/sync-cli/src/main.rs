//! Command-line interface for the index-sync engine.
//!
//! Drives the clear/update/rebuild command surface against an on-disk
//! index, with records loaded from a JSON file. Verbosity flags only
//! change diagnostic output, never behavior.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sync_engine::{clear_index, rebuild_index, update_index, CommandStatus, Coordinator};
use sync_index::{IndexStore, IndexStoreConfig};
use sync_types::{MemoryRecordSource, Record};

#[derive(Parser)]
#[command(name = "index-sync", about = "Keep a search index in sync with a record store")]
struct Cli {
    /// Path to the index directory
    #[arg(long, value_name = "DIR")]
    index_path: PathBuf,

    /// Path to a JSON file holding the records (array of {pk, fields})
    #[arg(long, value_name = "FILE")]
    records: PathBuf,

    /// Increase diagnostic output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drop every document from the index
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        no_input: bool,
    },
    /// Incrementally synchronize the index with the record store
    Update {
        /// Delete index entries whose records no longer exist
        #[arg(long)]
        remove: bool,
        /// Number of parallel workers
        #[arg(long, default_value_t = 1)]
        workers: usize,
        /// Maximum keys per batch
        #[arg(long, default_value_t = 1000)]
        batchsize: usize,
    },
    /// Clear the index and reindex the full record store
    Rebuild {
        /// Skip the confirmation prompt
        #[arg(long)]
        no_input: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn load_records(path: &PathBuf) -> Result<MemoryRecordSource> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records: Vec<Record> =
        serde_json::from_reader(BufReader::new(file)).context("parsing record file")?;
    info!(count = records.len(), "Loaded records");
    Ok(MemoryRecordSource::from_records(records))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_status(status: &CommandStatus) {
    if status.success {
        println!(
            "ok: {} document(s) processed, {} in index",
            status.processed, status.report.document_count
        );
    } else {
        eprintln!(
            "failed: indexed={} skipped={} failed={} fatal errors:",
            status.report.indexed, status.report.skipped, status.report.failed
        );
        for error in &status.report.fatal {
            eprintln!("  - {}", error);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = load_records(&cli.records)?;
    let store = IndexStore::open_or_create(IndexStoreConfig::new(&cli.index_path))?;
    let coordinator = Coordinator::new(source, store);

    let status = match cli.command {
        Command::Clear { no_input } => {
            if !no_input && !confirm("Remove ALL documents from the index?")? {
                println!("aborted");
                return Ok(());
            }
            clear_index(&coordinator)?
        }
        Command::Update {
            remove,
            workers,
            batchsize,
        } => update_index(&coordinator, remove, workers, batchsize)?,
        Command::Rebuild { no_input } => {
            if !no_input && !confirm("Clear and rebuild the ENTIRE index?")? {
                println!("aborted");
                return Ok(());
            }
            rebuild_index(&coordinator)?
        }
    };

    print_status(&status);

    if !status.success {
        bail!("synchronization finished with errors");
    }
    Ok(())
}
