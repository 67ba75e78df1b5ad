//! Add command - create a quote locally and post it to the remote.
//!
//! The quote is saved before the push is attempted. A failed push is
//! reported but the quote stays in the local collection.

use anyhow::Result;
use colored::Colorize;

use quote_sync::config::Config;

use crate::cli::{build_engine, runtime};

/// Arguments for the add command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotes add \"Simplicity is prerequisite for reliability.\" Engineering\n    \
    quotes add \"Be curious.\" Life --no-push")]
pub struct Args {
    /// The quote text
    pub text: String,

    /// Category to file the quote under
    pub category: String,

    /// Keep the quote local; do not post it to the remote
    #[arg(long)]
    pub no_push: bool,
}

/// Executes the add command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let engine = build_engine(&config)?;
    let rt = runtime()?;

    rt.block_on(async {
        let quote = if args.no_push {
            engine.record_local_quote(&args.text, &args.category).await?
        } else {
            let quote = engine.add_local_quote(&args.text, &args.category).await?;
            engine.flush_pushes().await;
            quote
        };

        println!("{} {}", "Added:".green(), quote);
        anyhow::Ok(())
    })
}
