//! Logging configuration using tracing
//!
//! Logs go to a daily rolling `folio-studio.log` in the configured log
//! directory. The filter comes from the settings file, never the environment.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::settings::Settings;
use crate::error::{Error, Result};

const LOG_FILE_NAME: &str = "folio-studio.log";

/// Initialize the logging subsystem
pub fn init(settings: &Settings) -> Result<()> {
    let log_dir = PathBuf::from(&settings.log_dir.value);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    let env_filter = EnvFilter::try_new(&settings.log_filter.value)
        .map_err(|error| Error::config(format!("invalid log filter: {}", error)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|error| Error::config(format!("logging already initialized: {}", error)))?;

    tracing::info!("folio-studio starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("API base URL: {}", settings.api_base_url.value);

    Ok(())
}

/// Path of the current log file
pub fn current_log_file(settings: &Settings) -> PathBuf {
    PathBuf::from(&settings.log_dir.value).join(LOG_FILE_NAME)
}
