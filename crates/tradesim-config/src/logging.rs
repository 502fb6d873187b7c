//! Logging setup.

use std::path::Path;
use thiserror::Error;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

use crate::LoggingConfig;

/// Errors while installing the global subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log file path: {0}")]
    InvalidPath(String),

    #[error("Could not open log file: {0}")]
    File(#[from] InitError),

    #[error("Subscriber already installed: {0}")]
    Init(#[from] TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_appender(path: &str) -> Result<RollingFileAppender, LoggingError> {
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)?)
}

fn format_layer(config: &LoggingConfig) -> Result<BoxedLayer, LoggingError> {
    let layer: BoxedLayer = match (config.format.as_str(), &config.file) {
        ("json", Some(file)) => fmt::layer()
            .json()
            .with_writer(file_appender(file)?)
            .boxed(),
        ("json", None) => fmt::layer().json().boxed(),
        ("compact", Some(file)) => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(file_appender(file)?)
            .boxed(),
        ("compact", None) => fmt::layer().compact().boxed(),
        (_, Some(file)) => fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender(file)?)
            .boxed(),
        (_, None) => fmt::layer().pretty().boxed(),
    };
    Ok(layer)
}

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn setup_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let layer = format_layer(config)?;

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    tracing::debug!(level = %config.level, format = %config.format, "logging initialized");
    Ok(())
}
