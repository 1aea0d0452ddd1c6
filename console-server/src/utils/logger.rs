//! Logging Infrastructure
//!
//! Console output (pretty or JSON) plus an optional daily rotating file
//! `console.YYYY-MM-DD.log` under `log_dir`.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "console";
const LOG_FILE_SUFFIX: &str = "log";

/// Days a rotated log file is kept
pub const LOG_RETENTION_DAYS: i64 = 14;

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level filter (e.g. "info", "console_server=debug"); `RUST_LOG` wins when set
/// * `json_format` - JSON lines instead of the human readable format
/// * `log_dir` - Optional directory for the rotating log file
///
/// # Examples
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// console_server::utils::logger::init_logger_with_file("debug", false, None)?;
/// # Ok(())
/// # }
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(dir)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(std::sync::Mutex::new(appender));
            Some(if json_format {
                layer.json().boxed()
            } else {
                layer.boxed()
            })
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        match cleanup_old_logs(Path::new(dir), LOG_RETENTION_DAYS) {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "Removed old log files"),
            Err(e) => tracing::warn!(error = %e, "Failed to clean up old log files"),
        }
    }

    Ok(())
}

/// Date encoded in a rotated file name, `None` for anything else
fn rotated_file_date(name: &str) -> Option<NaiveDate> {
    let date = name
        .strip_prefix(LOG_FILE_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(LOG_FILE_SUFFIX)?
        .strip_suffix('.')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Delete rotated log files older than `days` days. Returns how many were removed.
pub fn cleanup_old_logs(log_dir: &Path, days: i64) -> anyhow::Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }
    let cutoff = Local::now().date_naive() - chrono::Duration::days(days);

    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = rotated_file_date(name)
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::debug!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }
    Ok(removed)
}
