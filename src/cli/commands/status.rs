//! Status command - show the state of the local collection.
//!
//! Displays quote and category counts, the saved filter, the remote
//! endpoint, and the outcome of the last sync pass.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;
use quote_sync::storage::db::default_db_path;

use crate::cli::open_store;

/// Executes the status command.
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    println!("{}", "Quotes".bold().cyan());
    println!();
    println!("  {}  {}", "Database:".dimmed(), default_db_path()?.display());
    println!("  {}    {}", "Remote:".dimmed(), config.remote_url);
    println!();
    println!("  Quotes:     {}", store.len());
    println!("  Categories: {}", store.categories().len());
    println!("  Filter:     {}", store.selected_filter()?);

    println!();
    match store.last_sync()? {
        Some(record) => {
            let ago = chrono::Utc::now()
                .signed_duration_since(record.at)
                .num_minutes();
            let ago_str = if ago < 1 {
                "just now".to_string()
            } else if ago < 60 {
                format!("{ago} minutes ago")
            } else {
                format!("{} hours ago", ago / 60)
            };

            if record.failed {
                println!("  Last sync:  {} ({})", "failed".red(), ago_str.dimmed());
            } else {
                println!(
                    "  Last sync:  {} added, {} updated ({})",
                    record.added,
                    record.updated,
                    ago_str.dimmed()
                );
            }
        }
        None => {
            println!("  Last sync:  {}", "never".yellow());
            println!();
            println!("{}", "Hint: Run 'quotes sync' to pull from the remote".yellow());
        }
    }

    Ok(())
}
