//! Command-line interface for quote-sync.
//!
//! Provides the CLI commands for browsing the local quote collection,
//! adding quotes, and keeping the collection in step with the remote.

/// Individual CLI command implementations.
pub mod commands;

/// Output format options shared across commands.
pub mod format;

pub use format::OutputFormat;

use anyhow::{Context, Result};
use std::sync::Arc;

use quote_sync::config::Config;
use quote_sync::remote::RemoteClient;
use quote_sync::storage::{Database, LocalStore};
use quote_sync::sync::{ConsoleNotifier, SyncEngine, SyncSettings};

/// Opens the default store, seeding the built-in quotes on first use.
pub fn open_store(config: &Config) -> Result<LocalStore> {
    let db = Database::open_default()?;
    let mut store = LocalStore::open(db);
    if config.seed_defaults {
        store.seed_defaults()?;
    }
    Ok(store)
}

/// Builds a sync engine over the default store that reports to the terminal.
///
/// Notifications stay on display for the configured `notification_secs`.
pub fn build_engine(config: &Config) -> Result<SyncEngine<RemoteClient>> {
    let store = open_store(config)?;
    let remote = RemoteClient::from_config(config).context("Failed to create remote client")?;
    let settings = SyncSettings {
        notify_on_noop: config.notify_on_noop,
    };
    Ok(SyncEngine::new(
        store,
        remote,
        Arc::new(ConsoleNotifier::from_config(config)),
        settings,
    ))
}

/// Creates the runtime used by commands that talk to the remote.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create tokio runtime")
}
