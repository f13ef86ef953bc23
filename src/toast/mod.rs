//! # Toast notifications
//!
//! A single ephemeral message shown after discrete user actions such as copying
//! a snippet. The slot holds at most one [`Notification`] and walks it through a
//! fixed, timed lifecycle:
//!
//! ```text
//! Cleared ──notify──▶ Entering ──settle──▶ Settled ──visible──▶ Exiting ──exit──▶ Cleared
//! ```
//!
//! - **Entering**: set synchronously by [`NotificationQueue::notify`]
//! - **Settled**: the check icon is revealed (`settle` after Entering, 200 ms by default)
//! - **Exiting**: the toast fades out (`visible` after Entering, 2.5 s by default)
//! - **Cleared**: the slot is emptied and the message released (`exit` later, 0.5 s)
//!
//! ## Re-triggering
//!
//! Every cycle is driven by exactly one timer task. A new `notify` aborts the
//! running task before starting the next cycle, and each timed step also
//! compares its token with the live notification before writing. A late
//! wake-up from an older cycle therefore finds a different token and does
//! nothing.
//!
//! ## Timing source
//!
//! Timers use `tokio::time`, so tests can drive the whole lifecycle with a
//! paused clock.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::models::{Notification, NotificationPhase};
use crate::settings::NotificationTimings;

type Slot = Option<Notification>;

/// Owner of the toast slot and its timer.
///
/// The queue must be used from within a tokio runtime because `notify` spawns
/// the cycle timer. Dropping the queue cancels any pending timer.
pub struct NotificationQueue {
    /// Phase durations, read once per cycle.
    timings: NotificationTimings,

    /// Shared with the timer task, which writes phases back through it.
    tx: Arc<watch::Sender<Slot>>,

    /// Last token handed out; tokens are never reused.
    last_id: u64,

    /// Timer task of the live cycle, if any.
    timer: Option<JoinHandle<()>>,
}

impl NotificationQueue {
    pub fn new(timings: NotificationTimings) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            timings,
            tx: Arc::new(tx),
            last_id: 0,
            timer: None,
        }
    }

    /// Shows `message`, replacing whatever is on screen.
    ///
    /// Returns the token of the new notification.
    pub fn notify(&mut self, message: impl Into<String>) -> u64 {
        self.cancel_timer();

        self.last_id += 1;
        let id = self.last_id;
        let notification = Notification {
            id,
            message: message.into(),
            phase: NotificationPhase::Entering,
            issued_at: Utc::now(),
        };
        debug!("toast #{} entering: {}", id, notification.message);
        self.tx.send_replace(Some(notification));

        self.timer = Some(tokio::spawn(run_cycle(
            Arc::clone(&self.tx),
            id,
            self.timings,
        )));
        id
    }

    /// Clears the slot immediately and cancels the running cycle
    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.tx.send_if_modified(|slot| slot.take().is_some());
    }

    pub fn current(&self) -> Option<Notification> {
        self.tx.borrow().clone()
    }

    pub fn phase(&self) -> NotificationPhase {
        self.tx
            .borrow()
            .as_ref()
            .map_or(NotificationPhase::Cleared, |n| n.phase)
    }

    pub fn subscribe(&self) -> watch::Receiver<Slot> {
        self.tx.subscribe()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for NotificationQueue {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn run_cycle(tx: Arc<watch::Sender<Slot>>, id: u64, timings: NotificationTimings) {
    sleep(timings.settle).await;
    advance(&tx, id, NotificationPhase::Settled);

    sleep(timings.visible.saturating_sub(timings.settle)).await;
    advance(&tx, id, NotificationPhase::Exiting);

    sleep(timings.exit).await;
    let cleared = tx.send_if_modified(|slot| {
        if slot.as_ref().is_some_and(|n| n.id == id) {
            *slot = None;
            return true;
        }
        false
    });
    if cleared {
        debug!("toast #{} cleared", id);
    }
}

/// Moves the notification to `phase` if it is still the one identified by `id`
fn advance(tx: &watch::Sender<Slot>, id: u64, phase: NotificationPhase) {
    let applied = tx.send_if_modified(|slot| match slot {
        Some(notification) if notification.id == id => {
            notification.phase = phase;
            true
        }
        _ => false,
    });
    if applied {
        debug!("toast #{} {:?}", id, phase);
    }
}
