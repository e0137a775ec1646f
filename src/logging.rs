//! File-based logging for spotify-shuffle
//!
//! Logs go to a file instead of stdout, since the terminal UI owns the screen.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const LOG_DIR_VAR: &str = "SPOTIFY_SHUFFLE_LOG_DIR";

const DEFAULT_LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "spotify-shuffle";
const DEFAULT_FILTER: &str = "spotify_shuffle=debug,rspotify=info,warn";

/// Where log files go and which events are kept
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub filter: String,
}

impl LogSettings {
    /// `SPOTIFY_SHUFFLE_LOG_DIR` picks the directory and `RUST_LOG` the filter.
    /// Blank values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            dir: non_blank(LOG_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            filter: non_blank(EnvFilter::DEFAULT_ENV).unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }
}

/// Initialize the logging system.
///
/// Logs are written to `<dir>/spotify-shuffle.YYYY-MM-DD.log` with daily
/// rotation. Runs before `.env` is loaded, so only the process environment is
/// consulted.
pub fn init_logging() -> anyhow::Result<()> {
    let settings = LogSettings::from_lookup(|key| std::env::var(key).ok());
    std::fs::create_dir_all(&settings.dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &settings.dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; it has to outlive every log call.
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter {:?} ({}), using default", settings.filter, e);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %settings.dir.display(), filter = %settings.filter, "Logging initialized");

    Ok(())
}

/// Log a remote API request and its result
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(operation = $operation, "API request successful"),
            Err(e) => tracing::warn!(operation = $operation, error = %e, "API request failed"),
        }
    };
}

/// Log a remote API request with additional context
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "API request started");
    };
}
