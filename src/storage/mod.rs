//! Storage layer for quote-sync

pub mod db;
pub mod models;
pub mod store;

pub use db::Database;
pub use models::*;
pub use store::{LocalStore, SyncRecord};
