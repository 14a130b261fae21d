//! Scheduler tick loop.
//!
//! The pending set lives behind a mutex shared between the dispatcher
//! (which registers reminders) and a spawned ticker task that checks for
//! due reminders about once a second. Fired reminders leave the pending set
//! and are sent over an unbounded channel for the session to announce.

use crate::scheduler::reminder::Reminder;
use chrono::{Local, NaiveTime};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pending one-shot reminders and the channel due ones fire into.
pub struct ReminderScheduler {
    pending: Vec<Reminder>,
    fired_tx: mpsc::UnboundedSender<Reminder>,
}

impl ReminderScheduler {
    /// Create a scheduler firing into `fired_tx`.
    #[must_use]
    pub fn new(fired_tx: mpsc::UnboundedSender<Reminder>) -> Self {
        Self {
            pending: Vec::new(),
            fired_tx,
        }
    }

    /// Register a reminder. It stays pending until its fire minute.
    pub fn schedule(&mut self, reminder: Reminder) {
        debug!("reminder scheduled: {reminder}");
        self.pending.push(reminder);
    }

    /// Reminders that have not fired yet.
    #[must_use]
    pub fn pending(&self) -> &[Reminder] {
        &self.pending
    }

    /// Fire every reminder due at `now`.
    ///
    /// Fired reminders are removed from the pending set, so each fires
    /// exactly once even though the ticker revisits the same minute many
    /// times.
    pub fn tick_at(&mut self, now: NaiveTime) {
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].is_due_at(now) {
                let reminder = self.pending.remove(index);
                info!("reminder fired: {reminder}");
                if self.fired_tx.send(reminder).is_err() {
                    warn!("fired-reminder channel closed, dropping reminder");
                }
            } else {
                index += 1;
            }
        }
    }
}

/// Spawn the ticker task that checks for due reminders every
/// `tick_interval` until `cancel` is triggered.
pub fn spawn_ticker(
    scheduler: Arc<Mutex<ReminderScheduler>>,
    tick_interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    lock_scheduler(&scheduler).tick_at(Local::now().time());
                }
            }
        }
        debug!("reminder ticker stopped");
    })
}

/// Lock the shared scheduler, recovering from a poisoned mutex.
pub(crate) fn lock_scheduler(
    scheduler: &Arc<Mutex<ReminderScheduler>>,
) -> MutexGuard<'_, ReminderScheduler> {
    match scheduler.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
