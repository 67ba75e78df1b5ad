//! Show command - display a random quote.
//!
//! Picks a quote at random from the filtered set. Without `--category`
//! the saved filter (see `quotes filter`) is used.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;
use quote_sync::storage::CategoryFilter;

use crate::cli::open_store;

/// Arguments for the show command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotes show                       Random quote from the saved filter\n    \
    quotes show --category Wisdom     Random quote from one category\n    \
    quotes show --category all        Random quote from everything")]
pub struct Args {
    /// Only pick from this category ("all" for every quote)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<String>,
}

/// Executes the show command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let filter: CategoryFilter = match args.category {
        Some(c) => c.parse()?,
        None => store.selected_filter()?,
    };

    match store.random_quote(&filter, &mut rand::thread_rng()) {
        Some(quote) => {
            println!("\"{}\"", quote.text.bold());
            println!("  {} {}", "-".dimmed(), quote.category.cyan());
        }
        None => {
            let scope = match &filter {
                CategoryFilter::All => "the collection".to_string(),
                CategoryFilter::Category(c) => format!("category '{c}'"),
            };
            println!("{}", format!("No quotes in {scope}.").yellow());
            println!(
                "{}",
                "Add one with 'quotes add \"<text>\" <category>'".dimmed()
            );
        }
    }

    Ok(())
}
