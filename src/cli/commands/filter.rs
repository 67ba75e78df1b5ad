//! Filter command - show or change the saved category filter.
//!
//! The saved filter is used by `show` and `list` when no `--category`
//! is given. Setting it to a category that has no quotes is rejected.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;
use quote_sync::storage::CategoryFilter;

use crate::cli::open_store;

/// Arguments for the filter command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotes filter               Show the saved filter\n    \
    quotes filter Motivation    Only show Motivation quotes\n    \
    quotes filter all           Show every category again")]
pub struct Args {
    /// Category to select, or "all"
    #[arg(value_name = "CATEGORY")]
    pub category: Option<String>,
}

/// Executes the filter command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let Some(category) = args.category else {
        println!("{}", store.selected_filter()?);
        return Ok(());
    };

    let filter: CategoryFilter = category.parse()?;
    if let CategoryFilter::Category(c) = &filter {
        if !store.categories().contains(c) {
            anyhow::bail!("Unknown category '{c}'. Run 'quotes categories' to see them.");
        }
    }

    store.set_selected_filter(&filter)?;
    println!("{} {}", "Filter set to".green(), filter.to_string().cyan());
    Ok(())
}
