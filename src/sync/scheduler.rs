//! Periodic sync timer.
//!
//! Runs a sync pass every `period` until the returned [`SyncHandle`] is
//! stopped or dropped. Passes run inside the timer task one after another,
//! so a slow fetch delays the next tick instead of overlapping it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::SyncEngine;
use crate::remote::QuoteRemote;

/// Cancellation handle for a running periodic sync.
///
/// Dropping the handle without calling [`SyncHandle::stop`] aborts the task.
pub struct SyncHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Stops the timer and waits for the task to exit.
    ///
    /// A pass already in flight is allowed to finish first.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Periodic sync task ended abnormally: {e}");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Starts running `engine.run_sync_pass()` every `period`.
///
/// The first pass happens one full period after start.
pub fn start_periodic_sync<R: QuoteRemote>(
    engine: Arc<SyncEngine<R>>,
    period: Duration,
) -> SyncHandle {
    let period = period.max(Duration::from_millis(1));
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Periodic sync every {:?}", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = engine.run_sync_pass().await;
                    tracing::debug!(?result, "Periodic sync pass finished");
                }
                _ = &mut shutdown_rx => {
                    tracing::info!("Periodic sync shutting down");
                    break;
                }
            }
        }
    });

    SyncHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}
