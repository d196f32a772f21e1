//! Optional log4rs setup for applications embedding the client.
//!
//! The library itself only talks to the `log` facade; nothing is printed
//! unless the application installs a logger, with this helper or its own.

use crate::error::{NotionDbError, Result};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::path::Path;

const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";

/// Builds a log4rs configuration: console output at `level`, plus a file
/// appender recording everything from debug up when `log_file` is given.
pub fn build_logging_config(level: LevelFilter, log_file: Option<&Path>) -> Result<Config> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    let mut builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("stdout", Box::new(console)),
    );
    let mut root = Root::builder().appender("stdout");
    let mut root_level = level;

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NotionDbError::Logging(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(path)
            .map_err(|e| NotionDbError::Logging(format!("cannot open {}: {}", path.display(), e)))?;
        builder = builder.appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file)),
        );
        root = root.appender("file");
        root_level = root_level.max(LevelFilter::Debug);
    }

    builder
        .build(root.build(root_level))
        .map_err(|e| NotionDbError::Logging(e.to_string()))
}

/// Installs the configuration from [`build_logging_config`] as the global
/// logger. Fails if a logger is already installed.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let config = build_logging_config(level, log_file)?;
    log4rs::init_config(config).map_err(|e| NotionDbError::Logging(e.to_string()))?;
    match log_file {
        Some(path) => log::info!("Logging initialized. Log file: {}", path.display()),
        None => log::debug!("Logging initialized at {}", level),
    }
    Ok(())
}
