//! CLI commands for quote-sync.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// Add a quote locally and post it to the remote.
pub mod add;

/// List distinct categories.
pub mod categories;

/// Shell completion scripts.
pub mod completions;

/// Configuration viewing and management.
pub mod config;

/// Export quotes to a JSON file.
pub mod export;

/// Show or set the saved category filter.
pub mod filter;

/// Import quotes from a JSON file.
pub mod import;

/// List quotes.
pub mod list;

/// Show a random quote.
pub mod show;

/// Show collection and sync status.
pub mod status;

/// Run one sync pass.
pub mod sync;

/// Periodic sync in the foreground.
pub mod watch;
