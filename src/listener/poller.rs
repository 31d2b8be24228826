use super::watermark::Watermark;
use crate::notification_store::{Notification, NotificationStore, StoreError};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

type NotificationHandler = Arc<dyn Fn(&Notification) -> Result<()> + Send + Sync>;

/// One poll cycle over the notification store.
///
/// Implements the watermark protocol: the first successful poll establishes
/// a baseline at the store's highest row id without delivering anything
/// (rows already present predate this process), and every later poll
/// delivers the rows beyond the watermark in id order. The watermark is
/// advanced before a row is handed to subscribers, so no row is ever
/// delivered twice; a row lost between advance and delivery stays lost,
/// delivery is at-most-once.
pub struct NotificationPoller {
    store: Arc<dyn NotificationStore>,
    watermark: Watermark,
    in_flight: AtomicBool,
    handlers: Mutex<Vec<NotificationHandler>>,
}

impl NotificationPoller {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self {
            store,
            watermark: Watermark::new(),
            in_flight: AtomicBool::new(false),
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Register a handler for newly observed notifications.
    ///
    /// Handlers run synchronously inside the tick, in registration order. A
    /// handler returning an error is logged and does not stop delivery to
    /// the handlers after it.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&Notification) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers.lock().unwrap().push(Arc::new(handler));
    }

    /// Highest row id seen so far; 0 until the baseline poll has succeeded.
    pub fn last_seen_id(&self) -> i64 {
        self.watermark.get()
    }

    /// Execute one tick.
    ///
    /// Never propagates errors and never waits on another tick: if one is
    /// already in flight this call is dropped, not queued.
    pub fn poll_once(&self) {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("Poll tick still in flight, dropping this one");
            return;
        }
        // Cleared when the guard drops, including on a handler panic.
        let _guard = InFlightGuard(&self.in_flight);

        if let Err(err) = self.tick() {
            match err {
                StoreError::Unavailable(path) => {
                    debug!("Notification store not present at {:?}, will retry", path);
                }
                other => warn!("Poll tick failed: {}", other),
            }
        }
    }

    fn tick(&self) -> Result<(), StoreError> {
        if !self.watermark.is_initialized() {
            // Baseline poll: skip everything already in the store. An empty
            // table leaves the watermark unset, so the next poll that finds
            // rows is still the baseline poll.
            if let Some(max_id) = self.store.latest_id()? {
                self.watermark.advance_to(max_id);
                info!(
                    "Watermark initialized at {}, existing rows skipped",
                    max_id
                );
            }
            return Ok(());
        }

        let batch = self.store.notifications_after(self.watermark.get())?;
        for notification in &batch {
            if !self.watermark.is_new(notification.id) {
                continue;
            }
            self.watermark.advance_to(notification.id);
            debug!("Delivering notification {}", notification.id);
            self.emit(notification);
        }
        Ok(())
    }

    fn emit(&self, notification: &Notification) {
        // Snapshot the handler list so a handler may subscribe without
        // deadlocking on the same lock.
        let handlers: Vec<NotificationHandler> = self.handlers.lock().unwrap().clone();
        for (idx, handler) in handlers.iter().enumerate() {
            if let Err(err) = handler(notification) {
                warn!(
                    "Notification handler #{} failed for row {}: {:#}",
                    idx, notification.id, err
                );
            }
        }
    }

    /// Everything currently in the store, oldest first.
    ///
    /// Failures yield an empty list. This path does not touch the watermark.
    pub fn all_notifications(&self) -> Vec<Notification> {
        match self.store.all_notifications() {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Bulk notification read failed: {}", err);
                Vec::new()
            }
        }
    }
}

/// Clears the in-flight flag when the tick ends, panics included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
