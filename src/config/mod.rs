mod credential;
mod types;

pub use credential::*;
pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `$CONFIG_PATH`, falling back to `config.yaml`.
///
/// A missing default file yields built-in defaults; a missing file that was
/// named explicitly through `CONFIG_PATH` is an error.
pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(path) => load_from(&path).await,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from(DEFAULT_CONFIG_PATH).await,
        Err(_) => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Loads a `.env` file from the working directory if one exists.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        eprintln!("Warning: failed to load .env file: {err}");
    }
}

/// Builds the log filter: `RUST_LOG` directives win when set, otherwise the
/// configured level is used and must be a plain level name.
pub fn log_filter(rust_log: Option<&str>, configured_level: &str) -> Result<EnvFilter> {
    match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| Error::config(format!("Invalid RUST_LOG '{}': {}", directives, e))),
        None => {
            configured_level.parse::<LevelFilter>().map_err(|_| {
                Error::config(format!(
                    "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                    configured_level
                ))
            })?;
            Ok(EnvFilter::new(configured_level))
        }
    }
}
