//! Watch command - keep syncing in the foreground.
//!
//! Runs a sync pass every interval until Ctrl+C.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;

use quote_sync::config::Config;
use quote_sync::sync::start_periodic_sync;

use crate::cli::{build_engine, runtime};

/// Arguments for the watch command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotes watch                    Sync every configured interval (default 10s)\n    \
    quotes watch --interval 60      Sync every minute\n    \
    quotes watch --log-file         Also write logs to <data dir>/sync.log")]
pub struct Args {
    /// Seconds between passes (overrides sync_interval_secs)
    #[arg(short, long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Write logs to sync.log in the data directory
    #[arg(long)]
    pub log_file: bool,
}

/// Executes the watch command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let period = match args.interval {
        Some(0) => anyhow::bail!("--interval must be greater than zero"),
        Some(secs) => Duration::from_secs(secs),
        None => config.sync_interval(),
    };

    let engine = Arc::new(build_engine(&config)?);
    let rt = runtime()?;

    println!(
        "{} {} every {}s",
        "Watching".green(),
        engine.remote().url(),
        period.as_secs()
    );
    println!("{}", "Press Ctrl+C to stop".dimmed());

    rt.block_on(async {
        let handle = start_periodic_sync(Arc::clone(&engine), period);

        tokio::signal::ctrl_c().await?;
        tracing::info!("Received Ctrl+C, shutting down...");

        handle.stop().await;
        engine.flush_pushes().await;
        anyhow::Ok(())
    })?;

    println!("{}", "Stopped".dimmed());
    Ok(())
}
