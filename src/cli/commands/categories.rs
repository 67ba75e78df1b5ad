//! Categories command - list the distinct categories in the collection.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;
use quote_sync::storage::CategoryFilter;

use crate::cli::open_store;

/// Executes the categories command.
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;
    let selected = store.selected_filter()?;

    let categories = store.categories();
    if categories.is_empty() {
        println!("{}", "No categories yet.".yellow());
        return Ok(());
    }

    for category in categories {
        let count = store
            .filter(&CategoryFilter::Category(category.clone()))
            .len();
        let marker = if selected == CategoryFilter::Category(category.clone()) {
            "*".green()
        } else {
            " ".normal()
        };
        println!("{marker} {:20} {}", category.cyan(), count.to_string().dimmed());
    }

    Ok(())
}
