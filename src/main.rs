use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use toastwatch::config::{self, AppConfig};
use toastwatch::{NotificationListener, NotificationPoller, SqliteNotificationStore};

#[derive(Parser, Debug)]
#[clap(
    name = "toastwatch",
    about = "Watches the Windows notification store and prints new notifications as JSON lines"
)]
struct CliArgs {
    /// Path to a TOML configuration file (values override CLI flags).
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Path to the notification database. Defaults to the platform's
    /// wpndatabase.db location.
    #[clap(long)]
    pub db_path: Option<PathBuf>,

    /// Milliseconds between polls of the notification store.
    #[clap(long)]
    pub poll_interval_ms: Option<u64>,

    /// Log level used when the LOG_LEVEL env var is not set.
    #[clap(long)]
    pub logging_level: Option<String>,

    /// Print everything currently in the store as JSON lines, then exit.
    #[clap(long)]
    pub dump: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            poll_interval_ms: args.poll_interval_ms,
            logging_level: args.logging_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => Some(config::FileConfig::load(path)?),
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(app_config.logging_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let store = Arc::new(SqliteNotificationStore::new(&app_config.db_path));
    let poller = Arc::new(NotificationPoller::new(store));

    if cli_args.dump {
        for notification in poller.all_notifications() {
            println!("{}", serde_json::to_string(&notification)?);
        }
        return Ok(());
    }

    info!(
        "Watching {:?} every {}ms",
        app_config.db_path, app_config.poll_interval_ms
    );

    poller.subscribe(|notification| {
        println!("{}", serde_json::to_string(notification)?);
        Ok(())
    });

    let shutdown_token = CancellationToken::new();
    let listener = NotificationListener::new(
        Arc::clone(&poller),
        app_config.poll_interval(),
        shutdown_token.clone(),
    );

    tokio::select! {
        _ = listener.run() => {
            info!("Listener stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown");
            shutdown_token.cancel();
            // Give an in-flight tick a moment to finish
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    Ok(())
}
