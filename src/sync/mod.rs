//! Local/remote quote reconciliation.
//!
//! A sync pass fetches the full remote record set, merges it into the
//! local store by quote text, persists the store, and posts exactly one
//! notification. The remote always wins a category conflict; there are no
//! timestamps or versions to consult.
//!
//! Locally created quotes are applied and saved immediately, then pushed
//! to the remote in a background task. A failed push is reported but never
//! rolled back or retried.
//!
//! # Submodules
//!
//! - `notify` - Notification sinks
//! - `scheduler` - Periodic pass timer with a cancellation handle

pub mod notify;
pub mod scheduler;

use chrono::Utc;
use std::fmt;
use std::sync::{Arc, PoisonError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::remote::QuoteRemote;
use crate::storage::models::{Quote, ValidationError};
use crate::storage::{LocalStore, SyncRecord};

pub use notify::{ConsoleNotifier, NotificationSlot, Notify};
pub use scheduler::{start_periodic_sync, SyncHandle};

/// Errors from local mutations made through the engine.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The quote was rejected before anything changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The quote was applied in memory but could not be persisted.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Behavior switches for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Post "synced" after a pass that changed nothing.
    pub notify_on_noop: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            notify_on_noop: true,
        }
    }
}

/// Result of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Remote quotes appended to the local store.
    pub added: usize,
    /// Local quotes whose category was overwritten by the remote.
    pub updated: usize,
    /// The fetch failed and nothing was changed.
    pub failed: bool,
}

impl SyncResult {
    fn fetch_failed() -> Self {
        Self {
            failed: true,
            ..Default::default()
        }
    }

    /// The notice to post for a successful pass: new beats updated beats no-op.
    pub fn notice(&self, notify_on_noop: bool) -> Option<Notice> {
        if self.added > 0 {
            Some(Notice::Added(self.added))
        } else if self.updated > 0 {
            Some(Notice::Updated(self.updated))
        } else if notify_on_noop {
            Some(Notice::Synced)
        } else {
            None
        }
    }
}

/// Counts produced by [`merge_remote`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub updated: usize,
}

/// Every message the engine can post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added(usize),
    Updated(usize),
    Synced,
    FetchFailed(String),
    SaveFailed(String),
    Pushed,
    PushFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added(n) => write!(f, "{n} new quote(s) added from server"),
            Notice::Updated(n) => {
                write!(f, "{n} quote(s) updated from server (server version kept)")
            }
            Notice::Synced => write!(f, "Quotes synced with server"),
            Notice::FetchFailed(e) => write!(f, "Failed to sync with server: {e}"),
            Notice::SaveFailed(e) => write!(f, "Failed to save quotes: {e}"),
            Notice::Pushed => write!(f, "Quote posted to server"),
            Notice::PushFailed(e) => write!(f, "Failed to post quote to server: {e}"),
        }
    }
}

/// Merges a remote record set into `local`.
///
/// Each remote quote is matched against the first local quote with the same
/// text. Unmatched quotes are appended after all matching is done, in remote
/// order. A match with a different category takes the remote category.
pub fn merge_remote(local: &mut Vec<Quote>, remote: Vec<Quote>) -> MergeOutcome {
    let mut staged = Vec::new();
    let mut updated = 0;

    for incoming in remote {
        match local.iter_mut().find(|q| q.text == incoming.text) {
            None => staged.push(incoming),
            Some(existing) if existing.category == incoming.category => {}
            Some(existing) => {
                tracing::debug!(
                    text = %existing.text,
                    from = %existing.category,
                    to = %incoming.category,
                    "Remote category wins"
                );
                existing.category = incoming.category;
                updated += 1;
            }
        }
    }

    let added = staged.len();
    local.extend(staged);

    MergeOutcome { added, updated }
}

/// Reconciles a [`LocalStore`] against a [`QuoteRemote`].
pub struct SyncEngine<R: QuoteRemote> {
    store: Arc<Mutex<LocalStore>>,
    remote: Arc<R>,
    notifier: Arc<dyn Notify>,
    settings: SyncSettings,
    /// Held for the whole of a pass so passes never overlap.
    pass_guard: Mutex<()>,
    pushes: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl<R: QuoteRemote> SyncEngine<R> {
    pub fn new(
        store: LocalStore,
        remote: R,
        notifier: Arc<dyn Notify>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            remote: Arc::new(remote),
            notifier,
            settings,
            pass_guard: Mutex::new(()),
            pushes: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Arc<Mutex<LocalStore>> {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn settings(&self) -> SyncSettings {
        self.settings
    }

    /// Runs one full pass: fetch, merge, save, notify.
    ///
    /// Never returns an error. A failed fetch leaves the store untouched and
    /// is reported through the notifier and `SyncResult::failed`.
    pub async fn run_sync_pass(&self) -> SyncResult {
        let _pass = self.pass_guard.lock().await;

        tracing::debug!("Fetching remote quotes");
        let remote_quotes = match self.remote.fetch_quotes().await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!("Sync fetch failed: {e}");
                let result = SyncResult::fetch_failed();
                self.record(&*self.store.lock().await, &result);
                self.post(Notice::FetchFailed(e.to_string()));
                return result;
            }
        };
        let fetched = remote_quotes.len();

        let (result, save_error) = {
            let mut store = self.store.lock().await;
            let outcome = merge_remote(store.quotes_mut(), remote_quotes);
            let save_error = store.save().err();

            let result = SyncResult {
                added: outcome.added,
                updated: outcome.updated,
                failed: false,
            };
            self.record(&store, &result);
            (result, save_error)
        };

        tracing::info!(
            fetched,
            added = result.added,
            updated = result.updated,
            "Sync pass complete"
        );

        if let Some(e) = save_error {
            tracing::error!("Failed to save quotes after sync: {e:#}");
            self.post(Notice::SaveFailed(format!("{e:#}")));
        } else if let Some(notice) = result.notice(self.settings.notify_on_noop) {
            self.post(notice);
        }

        result
    }

    /// Validates, appends, and saves a quote, then pushes it in the background.
    pub async fn add_local_quote(&self, text: &str, category: &str) -> Result<Quote, SyncError> {
        let quote = self.record_local_quote(text, category).await?;
        self.push_in_background(quote.clone());
        Ok(quote)
    }

    /// Validates, appends, and saves a quote without pushing it.
    pub async fn record_local_quote(
        &self,
        text: &str,
        category: &str,
    ) -> Result<Quote, SyncError> {
        let quote = Quote::new(text, category)?;

        let mut store = self.store.lock().await;
        store.append(quote.clone());
        store.save()?;
        tracing::info!(category = %quote.category, "Added local quote");

        Ok(quote)
    }

    /// Sends a quote to the remote at most once. The outcome is only reported.
    ///
    /// Outside a tokio runtime nothing is sent and the push is reported as failed.
    pub fn push_in_background(&self, quote: Quote) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(text = %quote.text, "Cannot post quote without a runtime: {e}");
                self.post(Notice::PushFailed("no async runtime".to_string()));
                return;
            }
        };
        let remote = Arc::clone(&self.remote);
        let notifier = Arc::clone(&self.notifier);

        let handle = runtime.spawn(async move {
            match remote.push_quote(&quote).await {
                Ok(()) => {
                    tracing::info!(text = %quote.text, "Posted quote to remote");
                    notifier.notify(&Notice::Pushed.to_string());
                }
                Err(e) => {
                    tracing::warn!(text = %quote.text, "Failed to post quote: {e}");
                    notifier.notify(&Notice::PushFailed(e.to_string()).to_string());
                }
            }
        });

        let mut pushes = self.pushes.lock().unwrap_or_else(PoisonError::into_inner);
        pushes.retain(|h| !h.is_finished());
        pushes.push(handle);
    }

    /// Waits for every push started so far.
    pub async fn flush_pushes(&self) {
        let handles = {
            let mut pushes = self.pushes.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pushes)
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Push task ended abnormally: {e}");
            }
        }
    }

    fn post(&self, notice: Notice) {
        self.notifier.notify(&notice.to_string());
    }

    fn record(&self, store: &LocalStore, result: &SyncResult) {
        let record = SyncRecord {
            at: Utc::now(),
            added: result.added,
            updated: result.updated,
            failed: result.failed,
        };
        if let Err(e) = store.record_sync(&record) {
            tracing::warn!("Failed to record sync summary: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(text: &str, category: &str) -> Quote {
        Quote {
            text: text.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_merge_adds_unknown_text() {
        let mut local = vec![quote("A", "X")];
        let outcome = merge_remote(&mut local, vec![quote("A", "X"), quote("B", "Server")]);

        assert_eq!(outcome, MergeOutcome { added: 1, updated: 0 });
        assert_eq!(local, vec![quote("A", "X"), quote("B", "Server")]);
    }

    #[test]
    fn test_merge_remote_category_wins() {
        let mut local = vec![quote("A", "X")];
        let outcome = merge_remote(&mut local, vec![quote("A", "Y")]);

        assert_eq!(outcome, MergeOutcome { added: 0, updated: 1 });
        assert_eq!(local, vec![quote("A", "Y")]);
    }

    #[test]
    fn test_merge_equal_records_are_noop() {
        let mut local = vec![quote("A", "X"), quote("B", "Y")];
        let before = local.clone();
        let outcome = merge_remote(&mut local, before.clone());

        assert_eq!(outcome, MergeOutcome::default());
        assert_eq!(local, before);
    }

    #[test]
    fn test_merge_updates_first_duplicate_only() {
        let mut local = vec![quote("A", "X"), quote("A", "Z")];
        merge_remote(&mut local, vec![quote("A", "Y")]);
        assert_eq!(local, vec![quote("A", "Y"), quote("A", "Z")]);
    }

    #[test]
    fn test_merge_appends_after_existing_in_remote_order() {
        let mut local = vec![quote("A", "X")];
        merge_remote(
            &mut local,
            vec![quote("C", "S"), quote("A", "Y"), quote("B", "S")],
        );
        assert_eq!(
            local,
            vec![quote("A", "Y"), quote("C", "S"), quote("B", "S")]
        );
    }

    #[test]
    fn test_merge_new_text_repeated_in_remote_is_staged_twice() {
        let mut local = Vec::new();
        let outcome = merge_remote(&mut local, vec![quote("A", "S"), quote("A", "S")]);
        assert_eq!(outcome.added, 2);
    }

    #[test]
    fn test_notice_priority() {
        let both = SyncResult {
            added: 2,
            updated: 3,
            failed: false,
        };
        assert_eq!(both.notice(true), Some(Notice::Added(2)));

        let updated = SyncResult {
            added: 0,
            updated: 3,
            failed: false,
        };
        assert_eq!(updated.notice(false), Some(Notice::Updated(3)));

        let noop = SyncResult::default();
        assert_eq!(noop.notice(true), Some(Notice::Synced));
        assert_eq!(noop.notice(false), None);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::Added(2).to_string(), "2 new quote(s) added from server");
        assert_eq!(Notice::Synced.to_string(), "Quotes synced with server");
        assert!(Notice::PushFailed("timeout".into())
            .to_string()
            .contains("timeout"));
    }
}
