//! Integration tests for the sync engine and periodic scheduler
//!
//! The engine is driven by an in-memory remote so every pass is
//! deterministic, and by an in-memory SQLite store so persistence can be
//! inspected directly.

use quote_sync::remote::{QuoteRemote, RemoteError};
use quote_sync::storage::{Database, LocalStore, Quote, ValidationError};
use quote_sync::sync::{start_periodic_sync, Notify, SyncEngine, SyncError, SyncSettings};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Default)]
struct FakeRemote {
    records: Mutex<Vec<Quote>>,
    fail_fetch: AtomicBool,
    fail_push: AtomicBool,
    fetch_delay: Option<Duration>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pushed: Mutex<Vec<Quote>>,
}

impl FakeRemote {
    fn with_records(records: Vec<Quote>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    fn set_records(&self, records: Vec<Quote>) {
        *self.records.lock().unwrap() = records;
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn pushed(&self) -> Vec<Quote> {
        self.pushed.lock().unwrap().clone()
    }
}

impl QuoteRemote for FakeRemote {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(RemoteError::ServerError {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        let records = self.records.lock().unwrap().clone();
        Ok(records)
    }

    async fn push_quote(&self, quote: &Quote) -> Result<(), RemoteError> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(RemoteError::ServerError {
                status: 500,
                message: "push rejected".to_string(),
            });
        }
        self.pushed.lock().unwrap().push(quote.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notify for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

fn quote(text: &str, category: &str) -> Quote {
    Quote {
        text: text.to_string(),
        category: category.to_string(),
    }
}

/// Creates a store holding `quotes`, already saved.
fn create_test_store(quotes: &[Quote]) -> LocalStore {
    let db = Database::open_in_memory().expect("Failed to open database");
    let mut store = LocalStore::open(db);
    for q in quotes {
        store.append(q.clone());
    }
    store.save().expect("Failed to save store");
    store
}

fn create_engine(
    local: &[Quote],
    remote: FakeRemote,
    notify_on_noop: bool,
) -> (SyncEngine<FakeRemote>, Arc<RecordingNotifier>) {
    let notes = Arc::new(RecordingNotifier::default());
    let engine = SyncEngine::new(
        create_test_store(local),
        remote,
        notes.clone(),
        SyncSettings { notify_on_noop },
    );
    (engine, notes)
}

/// Like `create_engine`, but backed by a database file in `dir`.
fn create_file_engine(
    dir: &TempDir,
    local: &[Quote],
    remote: FakeRemote,
) -> (SyncEngine<FakeRemote>, Arc<RecordingNotifier>, PathBuf) {
    let path = dir.path().join("quotes.db");
    let mut store = LocalStore::open(Database::open(&path).expect("Failed to open database"));
    for q in local {
        store.append(q.clone());
    }
    store.save().expect("Failed to save store");

    let notes = Arc::new(RecordingNotifier::default());
    let engine = SyncEngine::new(store, remote, notes.clone(), SyncSettings::default());
    (engine, notes, path)
}

/// Drops the slots table behind the engine's back so every write fails.
fn break_storage(path: &Path) {
    rusqlite::Connection::open(path)
        .expect("Failed to open second connection")
        .execute_batch("DROP TABLE slots")
        .expect("Failed to drop slots table");
}

async fn local_quotes(engine: &SyncEngine<FakeRemote>) -> Vec<Quote> {
    engine.store().lock().await.quotes().to_vec()
}

async fn persisted_quotes(engine: &SyncEngine<FakeRemote>) -> Vec<Quote> {
    engine.store().lock().await.load()
}

// =============================================================================
// Sync Pass Tests
// =============================================================================

mod pass_tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_pass_is_idempotent() {
        let local = vec![quote("A", "X"), quote("B", "Y")];
        let remote = FakeRemote::with_records(local.clone());
        let (engine, _notes) = create_engine(&local, remote, true);

        let first = engine.run_sync_pass().await;
        let persisted_after_first = persisted_quotes(&engine).await;
        let second = engine.run_sync_pass().await;

        assert_eq!((first.added, first.updated, first.failed), (0, 0, false));
        assert_eq!((second.added, second.updated, second.failed), (0, 0, false));
        assert_eq!(persisted_quotes(&engine).await, persisted_after_first);
        assert_eq!(persisted_after_first, local);
    }

    #[tokio::test]
    async fn test_new_remote_record_is_appended() {
        let local = vec![quote("A", "X")];
        let remote = FakeRemote::with_records(vec![quote("A", "X"), quote("Fresh", "Server")]);
        let (engine, _notes) = create_engine(&local, remote, true);

        let result = engine.run_sync_pass().await;

        assert_eq!(result.added, 1);
        assert_eq!(result.updated, 0);
        let quotes = local_quotes(&engine).await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1], quote("Fresh", "Server"));
        assert_eq!(persisted_quotes(&engine).await, quotes);
    }

    #[tokio::test]
    async fn test_conflict_remote_category_wins() {
        let local = vec![quote("A", "X")];
        let remote = FakeRemote::with_records(vec![quote("A", "Y")]);
        let (engine, notes) = create_engine(&local, remote, true);

        let result = engine.run_sync_pass().await;

        assert_eq!(result.added, 0);
        assert_eq!(result.updated, 1);
        assert_eq!(local_quotes(&engine).await, vec![quote("A", "Y")]);
        assert_eq!(persisted_quotes(&engine).await, vec![quote("A", "Y")]);
        assert_eq!(
            notes.messages(),
            vec!["1 quote(s) updated from server (server version kept)"]
        );
    }

    #[tokio::test]
    async fn test_new_records_take_notification_priority() {
        let local = vec![quote("A", "X")];
        let remote = FakeRemote::with_records(vec![quote("A", "Y"), quote("B", "Server")]);
        let (engine, notes) = create_engine(&local, remote, true);

        let result = engine.run_sync_pass().await;

        assert_eq!((result.added, result.updated), (1, 1));
        assert_eq!(notes.messages(), vec!["1 new quote(s) added from server"]);
    }

    #[tokio::test]
    async fn test_noop_notification_is_configurable() {
        let local = vec![quote("A", "X")];

        let remote = FakeRemote::with_records(local.clone());
        let (engine, notes) = create_engine(&local, remote, true);
        engine.run_sync_pass().await;
        assert_eq!(notes.messages(), vec!["Quotes synced with server"]);

        let remote = FakeRemote::with_records(local.clone());
        let (engine, notes) = create_engine(&local, remote, false);
        engine.run_sync_pass().await;
        assert!(notes.messages().is_empty());
    }

    #[tokio::test]
    async fn test_one_notification_per_pass() {
        let remote = FakeRemote::with_records(vec![quote("A", "Server")]);
        let (engine, notes) = create_engine(&[], remote, true);

        engine.run_sync_pass().await;
        engine.run_sync_pass().await;
        engine.run_sync_pass().await;

        assert_eq!(
            notes.messages(),
            vec![
                "1 new quote(s) added from server",
                "Quotes synced with server",
                "Quotes synced with server",
            ]
        );
    }

    #[tokio::test]
    async fn test_pass_persists_even_without_changes() {
        let (engine, _notes) = create_engine(&[], FakeRemote::default(), true);
        engine.store().lock().await.append(quote("Unsaved", "Local"));

        engine.run_sync_pass().await;

        assert_eq!(persisted_quotes(&engine).await, vec![quote("Unsaved", "Local")]);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_store_untouched() {
        let local = vec![quote("A", "X")];
        let remote = FakeRemote::with_records(vec![quote("A", "Y"), quote("B", "Server")]);
        remote.fail_fetch.store(true, Ordering::SeqCst);
        let (engine, notes) = create_engine(&local, remote, true);

        let result = engine.run_sync_pass().await;

        assert!(result.failed);
        assert_eq!((result.added, result.updated), (0, 0));
        assert_eq!(local_quotes(&engine).await, local);
        assert_eq!(notes.messages().len(), 1);
        assert!(notes.messages()[0].starts_with("Failed to sync with server"));

        let record = engine.store().lock().await.last_sync().unwrap().unwrap();
        assert!(record.failed);
    }

    #[tokio::test]
    async fn test_recovers_after_fetch_failure() {
        let remote = FakeRemote::with_records(vec![quote("B", "Server")]);
        remote.fail_fetch.store(true, Ordering::SeqCst);
        let (engine, _notes) = create_engine(&[], remote, true);

        assert!(engine.run_sync_pass().await.failed);

        engine.remote().fail_fetch.store(false, Ordering::SeqCst);
        let result = engine.run_sync_pass().await;
        assert!(!result.failed);
        assert_eq!(result.added, 1);
    }

    #[tokio::test]
    async fn test_last_sync_is_recorded() {
        let remote = FakeRemote::with_records(vec![quote("A", "Server"), quote("B", "Server")]);
        let (engine, _notes) = create_engine(&[], remote, true);

        engine.run_sync_pass().await;

        let record = engine.store().lock().await.last_sync().unwrap().unwrap();
        assert_eq!(record.added, 2);
        assert_eq!(record.updated, 0);
        assert!(!record.failed);
    }

    #[tokio::test]
    async fn test_remote_changes_between_passes() {
        let remote = FakeRemote::with_records(vec![quote("A", "S")]);
        let (engine, _notes) = create_engine(&[], remote, true);
        engine.run_sync_pass().await;

        engine.remote().set_records(vec![quote("A", "T"), quote("B", "S")]);
        let result = engine.run_sync_pass().await;

        assert_eq!((result.added, result.updated), (1, 1));
        assert_eq!(
            local_quotes(&engine).await,
            vec![quote("A", "T"), quote("B", "S")]
        );
    }

    #[tokio::test]
    async fn test_save_failure_keeps_merge_and_posts_one_notice() {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let remote = FakeRemote::with_records(vec![quote("A", "Y"), quote("B", "Server")]);
        let (engine, notes, path) = create_file_engine(&dir, &[quote("A", "X")], remote);
        break_storage(&path);

        let result = engine.run_sync_pass().await;

        assert!(!result.failed, "only a failed fetch marks the pass failed");
        assert_eq!((result.added, result.updated), (1, 1));
        assert_eq!(
            local_quotes(&engine).await,
            vec![quote("A", "Y"), quote("B", "Server")]
        );

        let messages = notes.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Failed to save quotes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_passes_do_not_overlap() {
        let remote = FakeRemote {
            fetch_delay: Some(Duration::from_secs(2)),
            ..FakeRemote::with_records(vec![quote("A", "Server")])
        };
        let (engine, _notes) = create_engine(&[], remote, true);

        let (first, second) = tokio::join!(engine.run_sync_pass(), engine.run_sync_pass());

        assert_eq!(engine.remote().max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(first.added + second.added, 1, "second pass sees the first's result");
        assert_eq!(local_quotes(&engine).await.len(), 1);
    }
}

// =============================================================================
// Local Add / Push Tests
// =============================================================================

mod push_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_local_quote_applies_then_pushes() {
        let (engine, notes) = create_engine(&[], FakeRemote::default(), true);

        let added = engine
            .add_local_quote("  Keep going.  ", " Motivation ")
            .await
            .expect("add should succeed");
        assert_eq!(added, quote("Keep going.", "Motivation"));
        assert_eq!(persisted_quotes(&engine).await, vec![added.clone()]);

        engine.flush_pushes().await;

        assert_eq!(engine.remote().pushed(), vec![added]);
        assert_eq!(notes.messages(), vec!["Quote posted to server"]);
    }

    #[tokio::test]
    async fn test_push_failure_keeps_local_quote() {
        let remote = FakeRemote::default();
        remote.fail_push.store(true, Ordering::SeqCst);
        let (engine, notes) = create_engine(&[], remote, true);

        let added = engine.add_local_quote("Stay.", "Local").await.unwrap();
        engine.flush_pushes().await;

        assert!(engine.remote().pushed().is_empty());
        assert_eq!(local_quotes(&engine).await, vec![added.clone()]);
        assert_eq!(persisted_quotes(&engine).await, vec![added]);

        let messages = notes.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Failed to post quote to server"));
        assert!(messages[0].contains("push rejected"));
    }

    #[tokio::test]
    async fn test_validation_error_changes_nothing() {
        let (engine, notes) = create_engine(&[quote("A", "X")], FakeRemote::default(), true);

        let err = engine.add_local_quote("   ", "X").await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Validation(ValidationError::EmptyText)
        ));

        let err = engine.add_local_quote("Text", "").await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Validation(ValidationError::EmptyCategory)
        ));

        engine.flush_pushes().await;
        assert_eq!(local_quotes(&engine).await, vec![quote("A", "X")]);
        assert!(engine.remote().pushed().is_empty());
        assert!(notes.messages().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_on_add_skips_push() {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let (engine, notes, path) = create_file_engine(&dir, &[], FakeRemote::default());
        break_storage(&path);

        let err = engine.add_local_quote("Unsaved", "Local").await.unwrap_err();
        assert!(matches!(err, SyncError::Storage(_)));

        engine.flush_pushes().await;
        assert_eq!(local_quotes(&engine).await, vec![quote("Unsaved", "Local")]);
        assert!(engine.remote().pushed().is_empty());
        assert!(notes.messages().is_empty());
    }

    #[test]
    fn test_push_outside_runtime_is_reported() {
        let (engine, notes) = create_engine(&[], FakeRemote::default(), true);

        engine.push_in_background(quote("Offline", "Local"));

        assert!(engine.remote().pushed().is_empty());
        assert_eq!(
            notes.messages(),
            vec!["Failed to post quote to server: no async runtime"]
        );
    }

    #[tokio::test]
    async fn test_record_local_quote_does_not_push() {
        let (engine, _notes) = create_engine(&[], FakeRemote::default(), true);

        engine.record_local_quote("Offline", "Local").await.unwrap();
        engine.flush_pushes().await;

        assert!(engine.remote().pushed().is_empty());
        assert_eq!(local_quotes(&engine).await.len(), 1);
    }

    #[tokio::test]
    async fn test_pushed_quote_matching_remote_is_not_duplicated() {
        let (engine, _notes) = create_engine(&[], FakeRemote::default(), true);

        let added = engine.add_local_quote("Shared", "Local").await.unwrap();
        engine.flush_pushes().await;
        engine.remote().set_records(vec![added.clone()]);

        let result = engine.run_sync_pass().await;
        assert_eq!((result.added, result.updated), (0, 0));
        assert_eq!(local_quotes(&engine).await, vec![added]);
    }
}

// =============================================================================
// Scheduler Tests
// =============================================================================

mod scheduler_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_waits_one_period() {
        let (engine, _notes) = create_engine(&[], FakeRemote::default(), true);
        let engine = Arc::new(engine);

        let handle = start_periodic_sync(Arc::clone(&engine), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.remote().fetches(), 0);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_every_period_until_stopped() {
        let remote = FakeRemote::with_records(vec![quote("A", "Server")]);
        let (engine, _notes) = create_engine(&[], remote, true);
        let engine = Arc::new(engine);

        let handle = start_periodic_sync(Arc::clone(&engine), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(engine.remote().fetches(), 2);

        handle.stop().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(engine.remote().fetches(), 2, "no passes after stop");
        assert_eq!(local_quotes(&engine).await, vec![quote("A", "Server")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_timer() {
        let (engine, _notes) = create_engine(&[], FakeRemote::default(), true);
        let engine = Arc::new(engine);

        let handle = start_periodic_sync(Arc::clone(&engine), Duration::from_secs(10));
        drop(handle);

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(engine.remote().fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_pass_does_not_stop_timer() {
        let remote = FakeRemote::default();
        remote.fail_fetch.store(true, Ordering::SeqCst);
        let (engine, notes) = create_engine(&[], remote, true);
        let engine = Arc::new(engine);

        let handle = start_periodic_sync(Arc::clone(&engine), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(engine.remote().fetches(), 3);
        assert_eq!(notes.messages().len(), 3);
        assert!(!handle.is_finished());

        handle.stop().await;
    }
}
