//! Logger initialization.
//!
//! The library itself only logs through the `log` macros. Applications that do
//! not bring their own logger can install this one.

use std::io::Write;

use colored::*;
use log::LevelFilter;

use crate::config::{Config, LogFormat};
use crate::error_handling::InitializationError;

/// Installs an `env_logger` logger with the given level and format.
///
/// `RUST_LOG` is read first; `level` then applies to everything and to the
/// `crawlkit` module, while `reqwest` stays at `Info`.
///
/// # Arguments
///
/// * `level` - Minimum level to display
/// * `format` - `Plain` (coloured level letters) or `Json` (one object per line)
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Narrow the output to redirect handling
/// RUST_LOG=crawlkit::fetch=debug my-crawler
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("crawlkit", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = serde_json::json!({
                    "ts": chrono::Utc::now().timestamp_millis(),
                    "level": record.level().as_str(),
                    "target": record.target(),
                    "msg": record.args().to_string(),
                });
                writeln!(buf, "{}", line)
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let letter = &record.level().as_str()[..1];
                let letter = match record.level() {
                    log::Level::Error => letter.red(),
                    log::Level::Warn => letter.yellow(),
                    log::Level::Info => letter.green(),
                    log::Level::Debug => letter.blue(),
                    log::Level::Trace => letter.purple(),
                };
                writeln!(buf, "[{}] {} {}", letter, record.target().cyan(), record.args())
            });
        }
    }

    builder.try_init()?;
    Ok(())
}

/// Installs the logger described by `config.log_level` and `config.log_format`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger(config: &Config) -> Result<(), InitializationError> {
    init_logger_with(config.log_level.into(), config.log_format)
}
