use crate::payload::NotificationPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds between the FILETIME epoch (1601-01-01) and the Unix epoch.
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// FILETIME ticks per second; one tick is 100 nanoseconds.
const FILETIME_TICKS_PER_SEC: i64 = 10_000_000;

/// One row of the platform notification store.
///
/// Field names follow the store's columns (`kind` stands in for the reserved
/// `Type`). `payload` is the decoded toast content, `payload_raw` the XML
/// text it was decoded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub order: i64,
    pub id: i64,
    pub handler_id: i64,
    pub activity_id: Option<String>,
    pub kind: Option<String>,
    pub payload_raw: Option<String>,
    pub payload: Option<NotificationPayload>,
    pub tag: Option<String>,
    pub group: Option<String>,
    pub expiry_time: Option<i64>,
    pub arrival_time: DateTime<Utc>,
    pub data_version: i64,
    pub payload_type: Option<String>,
    pub boot_id: i64,
    pub expires_on_reboot: bool,
}

/// Convert a Windows FILETIME (100-nanosecond ticks since 1601-01-01 UTC)
/// to a calendar timestamp. Values outside the representable range clamp to
/// the Unix epoch.
pub fn filetime_to_datetime(ticks: i64) -> DateTime<Utc> {
    let unix_ticks = ticks.saturating_sub(FILETIME_UNIX_OFFSET_SECS * FILETIME_TICKS_PER_SEC);
    let secs = unix_ticks.div_euclid(FILETIME_TICKS_PER_SEC);
    let nanos = unix_ticks.rem_euclid(FILETIME_TICKS_PER_SEC) * 100;
    DateTime::from_timestamp(secs, nanos as u32).unwrap_or_default()
}
