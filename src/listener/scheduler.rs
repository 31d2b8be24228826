use super::poller::NotificationPoller;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Drives a [`NotificationPoller`] on a fixed interval until shut down.
///
/// Ticks run the poll body on the blocking pool, since the store is a
/// synchronous SQLite file. The shutdown token is checked between ticks
/// only: cancelling stops future ticks but lets a tick already in progress
/// finish.
pub struct NotificationListener {
    poller: Arc<NotificationPoller>,
    poll_interval: Duration,
    shutdown_token: CancellationToken,
}

impl NotificationListener {
    pub fn new(
        poller: Arc<NotificationPoller>,
        poll_interval: Duration,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            poller,
            poll_interval,
            shutdown_token,
        }
    }

    pub fn poller(&self) -> &Arc<NotificationPoller> {
        &self.poller
    }

    /// Run the poll loop until the shutdown token is cancelled.
    ///
    /// A tick that would fire while the previous one is still running is
    /// skipped, not queued: the interval skips missed ticks and the poller's
    /// own in-flight guard drops any overlap that slips through.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Skip the first immediate tick, wait for the first interval
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let poller = Arc::clone(&self.poller);
                    if let Err(err) = tokio::task::spawn_blocking(move || poller.poll_once()).await
                    {
                        warn!("Poll tick panicked: {}", err);
                    }
                }
                _ = self.shutdown_token.cancelled() => {
                    info!("Notification listener received shutdown signal");
                    break;
                }
            }
        }

        info!("Notification listener stopped");
    }
}
