//! Background delivery of notifications.
//!
//! `NotificationDispatcher::start` spawns one worker thread that owns the `Notifier`
//! and drains a bounded `crossbeam_channel`. Submitting never blocks: when the queue is
//! full (a slow or unreachable mail server) the notification is logged and dropped.
//! Delivery failures are logged too; there is no retry. The worker exits once every
//! dispatcher handle has been dropped.
use std::thread;

use crossbeam_channel::{Sender, TrySendError, bounded};
use log::{debug, error, warn};

use crate::notifier::{Notification, Notifier};

/// Handle for queueing notifications onto the worker.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: Sender<Notification>,
}

/// Notifications that may wait for the worker before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

impl NotificationDispatcher {
    /// Start the worker thread around `notifier`.
    pub fn start(notifier: Box<dyn Notifier>) -> Self {
        Self::with_capacity(notifier, DEFAULT_QUEUE_CAPACITY)
    }

    /// Start the worker with room for `capacity` pending notifications.
    pub fn with_capacity(notifier: Box<dyn Notifier>, capacity: usize) -> Self {
        let (tx, rx) = bounded::<Notification>(capacity);

        thread::spawn(move || {
            debug!("Notification worker started (Thread ID: {:?})", thread::current().id());
            for notification in rx.iter() {
                match notifier.notify(&notification.to, &notification.subject, &notification.body) {
                    Ok(()) => debug!("Notification sent to {}", notification.to),
                    Err(e) => warn!("Notification to {} failed: {}", notification.to, e),
                }
            }
            debug!("Notification worker stopping...");
        });

        Self { tx }
    }

    /// Queue `notification` for delivery. Never blocks; returns whether it was queued.
    pub fn submit(&self, notification: Notification) -> bool {
        match self.tx.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                warn!("Notification queue is full, dropping notification to {}", dropped.to);
                false
            }
            Err(TrySendError::Disconnected(dropped)) => {
                error!("Notification worker is gone, dropping notification to {}", dropped.to);
                false
            }
        }
    }
}
