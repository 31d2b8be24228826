use super::models::Notification;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a notification store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file does not exist. Routine while the owning process has
    /// not created it yet; callers retry on a later tick.
    #[error("notification store not found at {0:?}")]
    Unavailable(PathBuf),

    #[error("notification store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Read-only access to the external notification store.
///
/// Every call is self-contained: implementations must not require state to
/// carry over between calls, since the underlying database is owned and
/// written by another process.
pub trait NotificationStore: Send + Sync {
    /// Highest row id currently in the store, `None` when the table is empty.
    fn latest_id(&self) -> Result<Option<i64>, StoreError>;

    /// Rows with an id strictly greater than `id`, ascending by id.
    fn notifications_after(&self, id: i64) -> Result<Vec<Notification>, StoreError>;

    /// Every row in the store, ascending by id.
    fn all_notifications(&self) -> Result<Vec<Notification>, StoreError>;
}
