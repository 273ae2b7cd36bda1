//! Logging setup driven by the resolved `logging` section.
//!
//! Builds a `tracing-subscriber` registry with a console layer on stderr and,
//! when enabled, a rolling file layer from `tracing-appender`.

use crate::config::LoggingConfig;
use anyhow::{Context, Result, anyhow, bail};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the background file writer alive. Drop it only at shutdown.
#[must_use = "dropping the guard stops the background log writer"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Map a configured level name to a tracing filter directive.
///
/// Accepts tracing's own names plus `warning`, `critical` and `success`.
pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" | "success" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" | "critical" => Ok("error"),
        "off" => Ok("off"),
        other => Err(anyhow!("unknown log level '{}'", other)),
    }
}

/// Parse a rotation period.
pub fn parse_rotation(rotation: &str) -> Result<Rotation> {
    match rotation.trim().to_lowercase().as_str() {
        "minutely" | "minute" | "1 minute" => Ok(Rotation::MINUTELY),
        "hourly" | "hour" | "1 hour" => Ok(Rotation::HOURLY),
        "daily" | "day" | "1 day" | "midnight" | "00:00" => Ok(Rotation::DAILY),
        "never" | "none" | "" => Ok(Rotation::NEVER),
        other => Err(anyhow!("unknown log rotation '{}'", other)),
    }
}

/// Parse retention as the number of rotated files to keep.
///
/// Only the leading integer counts, so `"7 days"` keeps 7 files. Empty or
/// `0` means keep everything.
pub fn parse_retention(retention: &str) -> Result<Option<usize>> {
    let trimmed = retention.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        bail!("log retention '{}' must start with a file count", retention);
    }
    let count: usize = digits
        .parse()
        .with_context(|| format!("log retention '{}' is out of range", retention))?;
    Ok((count > 0).then_some(count))
}

/// Split the configured file path into directory and file name prefix.
fn file_target(file_path: &str) -> Result<(PathBuf, String)> {
    let path = Path::new(file_path);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("log file path '{}' has no file name", file_path))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_string()))
}

fn fmt_layer<W>(config: &LoggingConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_file(config.backtrace)
        .with_line_number(config.backtrace)
        .with_thread_ids(config.diagnose)
        .with_target(config.diagnose);
    if config.json_format {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Install the global subscriber described by `config`.
///
/// Fails if a subscriber is already installed or any setting is invalid.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_new(normalize_level(&config.level)?)
        .with_context(|| format!("invalid log level '{}'", config.level))?;

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(config, std::io::stderr, config.colorize)];
    let mut file_guard = None;

    if config.file_enabled {
        let rotation = parse_rotation(&config.rotation)?;
        let retention = parse_retention(&config.retention)?;
        let (dir, prefix) = file_target(&config.file_path)?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;

        let mut builder = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(prefix);
        if let Some(count) = retention {
            builder = builder.max_log_files(count);
        }
        let appender = builder
            .build(&dir)
            .with_context(|| format!("failed to open log file in {}", dir.display()))?;

        if config.enqueue {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_guard = Some(guard);
            layers.push(fmt_layer(config, writer, false));
        } else {
            layers.push(fmt_layer(config, appender, false));
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
