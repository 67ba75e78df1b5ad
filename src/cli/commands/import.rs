//! Import command - append quotes from a JSON file.
//!
//! The file must hold a JSON array of `{"text": ..., "category": ...}`
//! objects, the same shape `quotes export` writes. Entries with a blank
//! text or category are skipped.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use quote_sync::config::Config;

use crate::cli::open_store;

/// Arguments for the import command.
#[derive(clap::Args)]
pub struct Args {
    /// JSON file to import
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Executes the import command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config)?;

    let json = fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let imported = store.import_json(&json)?;

    println!(
        "{} {} quote(s) from {}",
        "Imported".green(),
        imported,
        args.path.display()
    );
    Ok(())
}
