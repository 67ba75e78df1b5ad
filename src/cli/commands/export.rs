//! Export command - write the whole collection to a JSON file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use quote_sync::config::Config;

use crate::cli::open_store;

/// Arguments for the export command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotes export                   Write quotes.json in the current directory\n    \
    quotes export backup.json       Write to a specific file\n    \
    quotes export -                 Write to stdout")]
pub struct Args {
    /// Destination file ("-" for stdout)
    #[arg(value_name = "PATH", default_value = "quotes.json")]
    pub path: PathBuf,
}

/// Executes the export command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let json = store.export_json()?;

    if args.path.as_os_str() == "-" {
        println!("{json}");
        return Ok(());
    }

    fs::write(&args.path, json)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;
    println!(
        "{} {} quote(s) to {}",
        "Exported".green(),
        store.len(),
        args.path.display()
    );
    Ok(())
}
