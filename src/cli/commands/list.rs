//! List command - list quotes, optionally filtered by category.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;
use quote_sync::storage::{CategoryFilter, Quote};

use crate::cli::{open_store, OutputFormat};

/// Arguments for the list command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotes list                      List quotes in the saved filter\n    \
    quotes list --category all       List every quote\n    \
    quotes list --format json        Output as JSON")]
pub struct Args {
    /// Only list this category ("all" for every quote)
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the list command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let filter: CategoryFilter = match args.category {
        Some(c) => c.parse()?,
        None => store.selected_filter()?,
    };
    let quotes: Vec<&Quote> = store.filter(&filter);

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&quotes)?);
        }
        OutputFormat::Text => {
            if quotes.is_empty() {
                println!("{}", "No quotes to show.".yellow());
                return Ok(());
            }

            println!(
                "{}",
                format!("{} quote(s) in {}", quotes.len(), filter).bold()
            );
            println!();
            for quote in quotes {
                println!("  {:14}  {}", quote.category.cyan(), quote.text);
            }
        }
    }

    Ok(())
}
