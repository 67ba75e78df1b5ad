//! quote-sync - a quote collection kept in step with a remote endpoint
//!
//! Quotes live in a local store that is mirrored to SQLite on every save.
//! A sync engine periodically pulls the remote record set, merges it by
//! quote text (the remote wins category conflicts), and pushes newly
//! created local quotes outward.

pub mod config;
pub mod remote;
pub mod storage;
pub mod sync;
