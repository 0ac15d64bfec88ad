use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Config, Verbosity};

impl From<Verbosity> for LevelFilter {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Silent => LevelFilter::Off,
            Verbosity::Minimal => LevelFilter::MoreSevereEqual(Level::Warn),
            Verbosity::Normal => LevelFilter::MoreSevereEqual(Level::Info),
            Verbosity::Detailed => LevelFilter::MoreSevereEqual(Level::Debug),
            Verbosity::Diagnostic => LevelFilter::All,
        }
    }
}

fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let stdout = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(Level::Warn))
        .build()?);

    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
        .build()?);

    builder.sink(stdout).sink(stderr);

    Ok(())
}

fn add_file_sink(builder: &mut LoggerBuilder, location: &Path) -> spdlog::Result<()> {
    let daily_sink = Arc::new(RotatingFileSink::builder()
        .base_path(location)
        .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
        .max_files(30)
        .rotate_on_open(false)
        .build()?);

    builder.sink(daily_sink);

    Ok(())
}

/// Installs the default logger. A command line verbosity takes precedence
/// over the one in the configuration file.
pub fn configure_logger(config: &Config, verbosity: Option<Verbosity>) -> spdlog::Result<()> {
    let verbosity = verbosity.unwrap_or_else(|| config.verbosity());

    let mut builder = Logger::builder();
    match config.log {
        Some(ref log) => {
            if let Some(ref location) = log.location {
                add_file_sink(&mut builder, location)?;
            }
            if log.log_to_console {
                add_console_sinks(&mut builder)?;
            }
        }
        None => add_console_sinks(&mut builder)?,
    }

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(verbosity.into());

    spdlog::set_default_logger(logger);

    Ok(())
}
