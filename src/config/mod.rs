mod file_config;

pub use file_config::FileConfig;

use crate::notification_store::default_store_path;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Default milliseconds between polls of the notification store.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
    pub logging_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub poll_interval_ms: u64,
    pub logging_level: LevelFilter,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI; the platform default path is the fallback.
        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .or_else(default_store_path)
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        let poll_interval_ms = file
            .poll_interval_ms
            .or(cli.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            bail!("poll_interval_ms must be positive");
        }

        let logging_level = match file.logging_level.or_else(|| cli.logging_level.clone()) {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow::anyhow!("Invalid logging_level: {}", level))?,
            None => LevelFilter::INFO,
        };

        Ok(Self {
            db_path,
            poll_interval_ms,
            logging_level,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
