//! Tracing subscriber setup for plugin processes.
//!
//! The host captures nothing a plugin prints, so a log file is usually the
//! only way to see what a plugin did. [`init_logging`] installs a registry
//! with an optional stderr layer and an optional non-blocking file layer,
//! both filtered by `RUST_LOG` or, when unset, [`LogConfig::level`].

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::LogConfig;
use crate::error::SdkError;

/// File name prefix used when the configured log path is a directory.
const LOG_FILE_PREFIX: &str = "streamdeck-plugin";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global tracing subscriber.
///
/// Returns the file writer's guard when a log file is configured; keep it
/// alive for the life of the process so buffered lines are flushed.
///
/// # Errors
///
/// Returns [`SdkError::Logging`] if the filter directive is invalid, the log
/// file cannot be created, or a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, SdkError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| SdkError::Logging(format!("invalid log level {:?}: {e}", config.level)))?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.stderr {
        layers.push(format_layer(config.json, std::io::stderr, true));
    }

    let mut guard = None;
    let mut log_path = None;
    if let Some(configured) = &config.log_file {
        let path = resolve_log_path(configured, is_directory(configured));
        let (dir, file_name) = split_log_path(&path)?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(|e| SdkError::Logging(format!("cannot open {}: {e}", path.display())))?;
        let (writer, worker) = tracing_appender::non_blocking(appender);
        layers.push(format_layer(config.json, writer, false));
        guard = Some(worker);
        log_path = Some(path);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| SdkError::Logging(e.to_string()))?;

    if let Some(path) = log_path {
        tracing::info!(path = %path.display(), "logging to file");
    }
    Ok(guard)
}

fn format_layer<W>(json: bool, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .with_line_number(true)
            .boxed()
    }
}

fn is_directory(path: &Path) -> bool {
    path.is_dir() || path.as_os_str().to_string_lossy().ends_with(std::path::MAIN_SEPARATOR)
}

/// Picks the file to write: a directory gets a timestamped file inside it.
fn resolve_log_path(configured: &Path, is_dir: bool) -> PathBuf {
    if is_dir {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        configured.join(format!("{LOG_FILE_PREFIX}-{timestamp}.log"))
    } else {
        configured.to_path_buf()
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String), SdkError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SdkError::Logging(format!("{} has no file name", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}
