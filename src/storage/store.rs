//! The authoritative in-memory quote list and its persisted mirror.
//!
//! `LocalStore` owns the ordered sequence of quotes. Mutations happen in
//! memory; callers persist them with [`LocalStore::save`], which rewrites
//! the whole `quotes` slot.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::db::{Database, LAST_SYNC_SLOT, QUOTES_SLOT, SELECTED_CATEGORY_SLOT};
use super::models::{self, CategoryFilter, Quote};

/// Summary of a finished sync pass, kept for `quotes status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// When the pass finished.
    pub at: DateTime<Utc>,
    /// Remote quotes appended locally.
    pub added: usize,
    /// Local quotes whose category was overwritten.
    pub updated: usize,
    /// Whether the fetch failed.
    pub failed: bool,
}

/// Quote list plus the database it is mirrored to.
pub struct LocalStore {
    db: Database,
    quotes: Vec<Quote>,
}

impl LocalStore {
    /// Builds the store from whatever is persisted in `db`.
    pub fn open(db: Database) -> Self {
        let quotes = load(&db);
        Self { db, quotes }
    }

    /// Re-reads the persisted mirror.
    ///
    /// Never fails: a missing slot, a read error, or corrupt JSON all
    /// yield an empty list.
    pub fn load(&self) -> Vec<Quote> {
        load(&self.db)
    }

    /// Overwrites the persisted mirror with the full in-memory list.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.quotes).context("Failed to serialize quotes")?;
        self.db.set_slot(QUOTES_SLOT, &json)
    }

    /// Adds a quote to the end of the list. Does not persist.
    pub fn append(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub(crate) fn quotes_mut(&mut self) -> &mut Vec<Quote> {
        &mut self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Whether the quotes slot has ever been written, even if it is now corrupt.
    pub fn has_persisted_quotes(&self) -> Result<bool> {
        Ok(self.db.get_slot(QUOTES_SLOT)?.is_some())
    }

    /// Seeds the built-in quotes into a store that has never been saved.
    ///
    /// Returns true if seeding happened.
    pub fn seed_defaults(&mut self) -> Result<bool> {
        if !self.is_empty() || self.has_persisted_quotes()? {
            return Ok(false);
        }
        for quote in models::default_quotes() {
            self.append(quote);
        }
        self.save()?;
        tracing::debug!("Seeded {} default quotes", self.len());
        Ok(true)
    }

    /// Quotes that pass `filter`, in stored order.
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        models::filter_quotes(&self.quotes, filter)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        models::categories(&self.quotes)
    }

    /// Picks a quote uniformly from the filtered subset.
    pub fn random_quote<R: Rng + ?Sized>(
        &self,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Option<&Quote> {
        self.filter(filter).choose(rng).copied()
    }

    /// The last selected filter; `All` when nothing was saved.
    pub fn selected_filter(&self) -> Result<CategoryFilter> {
        let value = self.db.get_slot(SELECTED_CATEGORY_SLOT)?;
        Ok(value
            .map(|v| v.parse::<CategoryFilter>().unwrap_or_default())
            .unwrap_or_default())
    }

    pub fn set_selected_filter(&self, filter: &CategoryFilter) -> Result<()> {
        self.db.set_slot(SELECTED_CATEGORY_SLOT, &filter.to_string())
    }

    /// Serializes every quote as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.quotes).context("Failed to serialize quotes")
    }

    /// Appends the valid quotes from a JSON array and saves.
    ///
    /// Invalid entries are skipped. Returns how many quotes were imported.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let incoming: Vec<Quote> =
            serde_json::from_str(json).context("Import file is not a JSON array of quotes")?;

        let mut imported = 0;
        for quote in incoming {
            match Quote::new(&quote.text, &quote.category) {
                Ok(quote) => {
                    self.append(quote);
                    imported += 1;
                }
                Err(e) => tracing::warn!("Skipping imported quote: {e}"),
            }
        }

        self.save()?;
        Ok(imported)
    }

    pub fn record_sync(&self, record: &SyncRecord) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to serialize sync record")?;
        self.db.set_slot(LAST_SYNC_SLOT, &json)
    }

    /// The last recorded sync pass, `None` if there is none or it is unreadable.
    pub fn last_sync(&self) -> Result<Option<SyncRecord>> {
        let Some(json) = self.db.get_slot(LAST_SYNC_SLOT)? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&json).ok())
    }
}

fn load(db: &Database) -> Vec<Quote> {
    let json = match db.get_slot(QUOTES_SLOT) {
        Ok(Some(json)) => json,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Could not read stored quotes, starting empty: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str(&json) {
        Ok(quotes) => quotes,
        Err(e) => {
            tracing::warn!("Stored quotes are corrupt, starting empty: {e}");
            Vec::new()
        }
    }
}
