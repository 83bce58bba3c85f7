//! # Logging
//!
//! Installs the process-wide `tracing` subscriber: an optional stderr layer
//! and an append-only file layer, both writing
//! `timestamp - target - LEVEL - message` lines.
//!
//! The level filter comes from `RUST_LOG` when set, otherwise from
//! [`LogConfig::level`]. Library code only emits events; nothing here runs
//! unless a binary calls [`init`].

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LOG_FILE_NAME};
use crate::errors::{PaveError, PaveResult};

/// `2026-10-19 14:03:27,512 - pave_core::lcca - INFO - Total Lifecycle Cost (LCCA): $1,086,260.88`
struct DashedFormat;

impl<S, N> FormatEvent<S, N> for DashedFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &tracing::Event<'_>) -> std::fmt::Result {
        let metadata = event.metadata();
        let now = chrono::Local::now();
        write!(
            writer,
            "{} - {} - {} - ",
            now.format("%Y-%m-%d %H:%M:%S,%3f"),
            metadata.target(),
            level_name(metadata.level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

fn build_filter(config: &LogConfig) -> PaveResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| PaveError::invalid_input("log.level", &config.level, e.to_string())),
    }
}

/// Install the global subscriber.
///
/// Hold the returned guard until exit; dropping it flushes the file writer.
/// Returns `None` for the guard when file logging is disabled.
pub fn init(config: &LogConfig) -> PaveResult<Option<WorkerGuard>> {
    let filter = build_filter(config)?;

    let console_layer = config.console.then(|| {
        fmt::layer()
            .event_format(DashedFormat)
            .with_writer(std::io::stderr)
    });

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let appender = file_appender(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .event_format(DashedFormat)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PaveError::Internal {
            message: format!("Failed to install logger: {}", e),
        })?;

    Ok(guard)
}

fn file_appender(path: &Path) -> PaveResult<RollingFileAppender> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| LOG_FILE_NAME.to_string());

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|e| PaveError::file_error("open log", path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(&Level::WARN), "WARNING");
        assert_eq!(level_name(&Level::INFO), "INFO");
    }

    #[test]
    fn test_file_appender_creates_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.log");
        assert!(file_appender(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_bad_level_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LogConfig {
            level: "pave_core=[".to_string(),
            ..LogConfig::default()
        };
        assert!(build_filter(&config).is_err());
    }
}
