//! Notification sinks for sync outcomes.
//!
//! A notification is a short human-readable message. [`NotificationSlot`]
//! models an on-screen banner: one message at a time, wiped a fixed time
//! after it was posted. [`ConsoleNotifier`] prints to the terminal.

use colored::Colorize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::config::Config;

/// Receives human-readable sync notifications.
pub trait Notify: Send + Sync {
    fn notify(&self, message: &str);
}

/// Single-slot notification display.
///
/// Each notification replaces the current one and schedules a clear
/// `display_for` later. Clears are unconditional, so the timer of an older
/// notification also wipes any newer message that replaced it.
#[derive(Debug, Clone)]
pub struct NotificationSlot {
    current: Arc<Mutex<Option<String>>>,
    display_for: Duration,
}

impl NotificationSlot {
    pub fn new(display_for: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            display_for,
        }
    }

    /// The message currently on display.
    pub fn current(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn display_for(&self) -> Duration {
        self.display_for
    }
}

impl Default for NotificationSlot {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl Notify for NotificationSlot {
    fn notify(&self, message: &str) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.to_string());

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let slot = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(slot.display_for).await;
                    slot.clear();
                });
            }
            Err(_) => {
                tracing::debug!("No async runtime, notification will stay until replaced");
            }
        }
    }
}

/// Prints notifications to stderr and keeps the latest one in a slot.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier {
    slot: NotificationSlot,
}

impl ConsoleNotifier {
    pub fn new(display_for: Duration) -> Self {
        Self {
            slot: NotificationSlot::new(display_for),
        }
    }

    /// Uses `notification_secs` from the config as the display time.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.notification_duration())
    }

    pub fn slot(&self) -> &NotificationSlot {
        &self.slot
    }
}

impl Notify for ConsoleNotifier {
    fn notify(&self, message: &str) {
        tracing::debug!(notification = message, "Posted notification");
        self.slot.notify(message);
        eprintln!("{} {}", "»".cyan(), message);
    }
}
