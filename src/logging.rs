//! Tracing setup.
//!
//! The dashboard owns the terminal, so logs go to `{state_dir}/wrs.log`.
//! `RUST_LOG` overrides the default filter. A log file that can't be opened
//! never stops the program: logging is discarded instead.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

pub const LOG_FILE_NAME: &str = "wrs.log";
const DEFAULT_FILTER: &str = "warehouse_sales=info";

/// Install the global subscriber. Returns the log file path when file logging
/// is active, `None` when lines are discarded.
pub fn init(state_dir: &Path) -> Option<PathBuf> {
    let (writer, target) = match file_writer(state_dir) {
        Ok(writer) => (writer, Some(state_dir.join(LOG_FILE_NAME))),
        Err(e) => {
            eprintln!("warning: {e}; continuing without a log file");
            (BoxMakeWriter::new(std::io::sink), None)
        }
    };

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init();
    if installed.is_err() {
        return None;
    }

    if let Some(path) = &target {
        tracing::info!(log = %path.display(), "logging initialized");
    }
    target
}

fn file_writer(state_dir: &Path) -> Result<BoxMakeWriter, AppError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(state_dir)
        .map_err(|e| {
            AppError::io(format!(
                "Failed to open log file in '{}': {e}",
                state_dir.display()
            ))
        })?;
    Ok(BoxMakeWriter::new(appender))
}
