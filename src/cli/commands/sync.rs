//! Sync command - run one reconciliation pass now.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;

use crate::cli::{build_engine, runtime};

/// Executes the sync command.
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let engine = build_engine(&config)?;
    let rt = runtime()?;

    println!("{} {}", "Syncing with".dimmed(), engine.remote().url());
    let result = rt.block_on(engine.run_sync_pass());

    if result.failed {
        println!("{}", "Sync failed; local quotes unchanged.".red());
    } else {
        println!(
            "{} {} added, {} updated",
            "Sync complete:".green(),
            result.added,
            result.updated
        );
    }

    Ok(())
}
