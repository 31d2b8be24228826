use super::models::{filetime_to_datetime, Notification};
use super::trait_def::{NotificationStore, StoreError};
use crate::payload::NotificationPayload;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

/// Column list of the platform's `Notification` table, in the positional
/// order the row mapping relies on. `Order` and `Group` are SQL keywords and
/// need bracket quoting.
const NOTIFICATION_COLUMNS: &str = "[Order], Id, HandlerId, ActivityId, Type, Payload, Tag, \
     [Group], ExpiryTime, ArrivalTime, DataVersion, PayloadType, BootId, ExpiresOnReboot";

/// Default location of the notification database:
/// `%LOCALAPPDATA%\Microsoft\Windows\Notifications\wpndatabase.db`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| {
        dir.join("Microsoft")
            .join("Windows")
            .join("Notifications")
            .join("wpndatabase.db")
    })
}

/// SQLite-backed view of the platform notification store.
///
/// The database file belongs to another process, so no connection is held:
/// every call checks that the file exists, opens it read-only, and drops the
/// connection before returning. The file being absent is a routine
/// condition reported as [`StoreError::Unavailable`].
pub struct SqliteNotificationStore {
    db_path: PathBuf,
}

impl SqliteNotificationStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if !self.db_path.exists() {
            return Err(StoreError::Unavailable(self.db_path.clone()));
        }
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Positional mapping of one store row.
    fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
        let payload_raw = payload_text(row, 5)?;
        Ok(Notification {
            order: row.get(0)?,
            id: row.get(1)?,
            handler_id: row.get(2)?,
            activity_id: row.get(3)?,
            kind: row.get(4)?,
            payload: NotificationPayload::parse(payload_raw.as_deref()),
            payload_raw,
            tag: row.get(6)?,
            group: row.get(7)?,
            expiry_time: row.get(8)?,
            arrival_time: filetime_to_datetime(row.get(9)?),
            data_version: row.get::<_, Option<i64>>(10)?.unwrap_or(0),
            payload_type: row.get(11)?,
            boot_id: row.get::<_, Option<i64>>(12)?.unwrap_or(0),
            expires_on_reboot: row.get::<_, Option<bool>>(13)?.unwrap_or(false),
        })
    }
}

impl NotificationStore for SqliteNotificationStore {
    fn latest_id(&self) -> Result<Option<i64>, StoreError> {
        let conn = self.open()?;
        let max = conn.query_row("SELECT MAX(Id) FROM Notification", [], |row| row.get(0))?;
        Ok(max)
    }

    fn notifications_after(&self, id: i64) -> Result<Vec<Notification>, StoreError> {
        let conn = self.open()?;
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM Notification WHERE Id > ?1 ORDER BY Id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![id], Self::row_to_notification)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn all_notifications(&self) -> Result<Vec<Notification>, StoreError> {
        let conn = self.open()?;
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM Notification ORDER BY Id ASC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], Self::row_to_notification)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

/// Payload column text. The production database stores toast XML as BLOB
/// while hand-written fixtures use TEXT; both are accepted, mirroring
/// sqlite's own column_text coercion.
fn payload_text(row: &Row, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
    })
}
