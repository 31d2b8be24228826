//! Read-only tailer for the Windows notification store (`wpndatabase.db`).
//!
//! The store is a SQLite database owned and written by the platform's
//! notification service; this crate only ever reads it. A
//! [`NotificationPoller`] remembers the highest row id it has seen and on
//! each poll delivers the rows beyond it, decoding each row's toast XML
//! payload along the way. A [`NotificationListener`] drives the poller on a
//! fixed interval until shut down.

pub mod config;
pub mod listener;
pub mod notification_store;
pub mod payload;

// Re-export commonly used types for convenience
pub use listener::{NotificationListener, NotificationPoller};
pub use notification_store::{Notification, NotificationStore, SqliteNotificationStore};
pub use payload::NotificationPayload;
