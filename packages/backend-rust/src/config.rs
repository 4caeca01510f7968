//! Process configuration
//!
//! Environment variables layered over an optional JSON engine config file.

use std::path::{Path, PathBuf};

use pathway_algo::config::{ConfigError, EngineConfig};

use crate::logging::{FileLogSettings, LogRotation, LogSettings, DEFAULT_LOG_DIR};

pub const DEFAULT_SESSION_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid engine config: {0}")]
    Engine(#[from] ConfigError),
    #[error("invalid value for {name}: {value}")]
    Env { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logging: LogSettings,
    pub engine_config_path: Option<PathBuf>,
    /// How many recent sessions feed difficulty and recommendations
    pub session_limit: usize,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LogSettings::default(),
            engine_config_path: None,
            session_limit: DEFAULT_SESSION_LIMIT,
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let logging = logging_from_env()?;

        let engine_config_path = std::env::var("PATHWAY_CONFIG_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let session_limit = std::env::var("PATHWAY_SESSION_LIMIT")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_LIMIT);

        let mut engine = match &engine_config_path {
            Some(path) => load_engine_config(path)?,
            None => EngineConfig::default(),
        };

        if let Some(rate) = env_f64("PATHWAY_TARGET_SUCCESS_RATE")? {
            engine.difficulty.target_success_rate = rate;
        }
        if let Some(hours) = env_f64("PATHWAY_DEFAULT_BASE_HOURS")? {
            engine.planner.default_base_hours = hours;
        }
        engine.validate()?;

        Ok(Self {
            logging,
            engine_config_path,
            session_limit,
            engine,
        })
    }
}

/// Reads a (possibly partial) JSON engine config; missing fields take defaults.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(EngineConfig::from_json_str(&raw)?)
}

/// `RUST_LOG` directives, plus a file sink when `ENABLE_FILE_LOGS` is `true` or `1`.
fn logging_from_env() -> Result<LogSettings, ConfigLoadError> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let file_enabled = std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if !file_enabled {
        return Ok(LogSettings { level, file: None });
    }

    let rotation = match std::env::var("LOG_ROTATION") {
        Ok(value) => value
            .parse::<LogRotation>()
            .map_err(|_| ConfigLoadError::Env {
                name: "LOG_ROTATION",
                value,
            })?,
        Err(_) => LogRotation::default(),
    };
    let dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());

    Ok(LogSettings {
        level,
        file: Some(FileLogSettings {
            dir: PathBuf::from(dir),
            rotation,
            ..FileLogSettings::default()
        }),
    })
}

fn env_f64(name: &'static str) -> Result<Option<f64>, ConfigLoadError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigLoadError::Env { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.session_limit, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert!(config.engine_config_path.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"difficulty": {{"targetSuccessRate": 0.8}}}}"#).unwrap();
        let engine = load_engine_config(file.path()).unwrap();
        assert_eq!(engine.difficulty.target_success_rate, 0.8);
        assert_eq!(engine.planner.default_base_hours, 4.0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_engine_config(Path::new("/nonexistent/pathway.json")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Read { .. }));
    }
}
