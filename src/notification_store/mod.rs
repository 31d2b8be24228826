mod models;
mod store;
mod trait_def;

pub use models::{filetime_to_datetime, Notification};
pub use store::{default_store_path, SqliteNotificationStore};
pub use trait_def::{NotificationStore, StoreError};
