//! Configuration management and logging setup.

mod logging;
mod settings;

pub use logging::{setup_logging, LoggingError};
pub use settings::{AppConfig, AppSettings, LoggingConfig, SimulationSettings};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;

fn environment() -> Environment {
    Environment::with_prefix("TRADESIM")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(environment())
        .build()?;

    config.try_deserialize()
}

/// Load configuration from TOML text, still honoring environment overrides.
pub fn load_config_from_str(toml: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .add_source(environment())
        .build()?;

    config.try_deserialize()
}
